use thiserror::Error;

/// Failures of the path-addressable tree view.
///
/// Rule application discards these; they only surface to callers that use
/// [`crate::TreeExt`] directly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("Malformed path {path:?}: {reason}")]
    Malformed { path: String, reason: String },
    #[error("Cannot descend into scalar at {path}")]
    NotAContainer { path: String },
    #[error("Index {index} out of range at {path}")]
    IndexOutOfRange { path: String, index: usize },
}

#[derive(Error, Debug)]
pub enum NeatError {
    #[error("input document is empty")]
    EmptyInput,
    #[error("input is not a valid document: {excerpt}")]
    InvalidDocument { excerpt: String },
    #[error("Path error: {0}")]
    Path(#[from] PathError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl NeatError {
    /// Builds an `InvalidDocument` carrying the first 20 characters of `input`.
    pub fn invalid(input: &str) -> Self {
        Self::InvalidDocument { excerpt: input.chars().take(20).collect() }
    }

    /// Builds an `InvalidDocument` for a decoded root that is not an
    /// object. Only the JSON type is reported, never the content.
    pub fn not_an_object(doc: &serde_json::Value) -> Self {
        use serde_json::Value;
        let found = match doc {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        };
        Self::InvalidDocument { excerpt: found.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, NeatError>;
