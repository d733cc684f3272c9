//! Dotted path micro-language for addressing into a record.
//!
//! `.` separates steps, a bare integer selects a list index, and `\`
//! escapes the next character so domain-qualified keys such as
//! `kubectl\.kubernetes\.io/restartedAt` stay a single step.

use crate::error::PathError;
use std::fmt;

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    /// A bare integer. Selects a list element, or the field of the same
    /// name when the container turns out to be an object.
    Index(usize),
}

impl Segment {
    /// The step as an object key.
    pub fn as_key(&self) -> String {
        match self {
            Self::Key(k) => k.clone(),
            Self::Index(i) => i.to_string(),
        }
    }
}

/// Ordered sequence of steps from the record root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// The empty path, addressing the root.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Result<Self, PathError> {
        let malformed = |reason: &str| PathError::Malformed {
            path: text.to_string(),
            reason: reason.to_string(),
        };
        if text.is_empty() {
            return Err(malformed("empty path"));
        }

        let mut segments = Vec::new();
        let mut current = String::new();
        let mut escaped = false;
        let mut chars = text.chars();
        loop {
            match chars.next() {
                Some('\\') => match chars.next() {
                    Some(c) => {
                        current.push(c);
                        escaped = true;
                    }
                    None => return Err(malformed("dangling escape")),
                },
                Some('.') => {
                    segments.push(Self::finish(&current, escaped).ok_or_else(|| malformed("empty step"))?);
                    current.clear();
                    escaped = false;
                }
                Some(c) => current.push(c),
                None => {
                    segments.push(Self::finish(&current, escaped).ok_or_else(|| malformed("empty step"))?);
                    break;
                }
            }
        }
        Ok(Self { segments })
    }

    fn finish(token: &str, escaped: bool) -> Option<Segment> {
        if token.is_empty() {
            return None;
        }
        if !escaped && token.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(i) = token.parse() {
                return Some(Segment::Index(i));
            }
        }
        Some(Segment::Key(token.to_string()))
    }

    /// A new path with `key` appended.
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Key(key.into()));
        Self { segments }
    }

    /// A new path with list index `index` appended.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Index(index));
        Self { segments }
    }

    /// The first `len` steps of this path.
    pub fn prefix(&self, len: usize) -> Self {
        Self { segments: self.segments[..len.min(self.segments.len())].to_vec() }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, seg) in self.segments.iter().enumerate() {
            if n > 0 {
                f.write_str(".")?;
            }
            match seg {
                Segment::Index(i) => write!(f, "{i}")?,
                Segment::Key(k) => f.write_str(&escape_key(k))?,
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Escapes a literal key so it parses back as a single [`Segment::Key`].
pub fn escape_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let numeric = !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit());
    for (n, c) in key.chars().enumerate() {
        if matches!(c, '.' | '\\') || (numeric && n == 0) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
