//! Path-addressable view over a `serde_json::Value` tree.

use crate::error::PathError;
use crate::path::{Path, Segment};
use serde_json::{Map, Value};

/// Get/set/delete by [`Path`] on any JSON-shaped tree.
pub trait TreeExt {
    /// Value at `path`, or `None` when any step is absent.
    fn get_path(&self, path: &Path) -> Option<&Value>;

    fn get_path_mut(&mut self, path: &Path) -> Option<&mut Value>;

    /// Writes `value` at `path`, creating missing intermediate containers.
    /// A missing step followed by an index creates a list, otherwise an object.
    fn set_path(&mut self, path: &Path, value: Value) -> Result<(), PathError>;

    /// Removes the value at `path` and returns it. An absent target is
    /// `Ok(None)`, so deleting twice is the same as deleting once.
    fn delete_path(&mut self, path: &Path) -> Result<Option<Value>, PathError>;

    /// True for objects and lists with zero entries. Empty strings are data.
    fn is_empty_container(&self) -> bool;

    /// [`TreeExt::get_path`] over a textual path.
    fn get_at(&self, path: &str) -> Result<Option<&Value>, PathError> {
        Ok(self.get_path(&Path::parse(path)?))
    }

    /// [`TreeExt::set_path`] over a textual path.
    fn set_at(&mut self, path: &str, value: Value) -> Result<(), PathError> {
        self.set_path(&Path::parse(path)?, value)
    }

    /// [`TreeExt::delete_path`] over a textual path.
    fn delete_at(&mut self, path: &str) -> Result<Option<Value>, PathError> {
        self.delete_path(&Path::parse(path)?)
    }
}

fn step<'a>(node: &'a Value, seg: &Segment) -> Option<&'a Value> {
    match (node, seg) {
        (Value::Object(map), seg) => map.get(&seg.as_key()),
        (Value::Array(items), Segment::Index(i)) => items.get(*i),
        _ => None,
    }
}

fn step_mut<'a>(node: &'a mut Value, seg: &Segment) -> Option<&'a mut Value> {
    match (node, seg) {
        (Value::Object(map), seg) => map.get_mut(&seg.as_key()),
        (Value::Array(items), Segment::Index(i)) => items.get_mut(*i),
        _ => None,
    }
}

fn empty_for(next: &Segment) -> Value {
    match next {
        Segment::Index(_) => Value::Array(Vec::new()),
        Segment::Key(_) => Value::Object(Map::new()),
    }
}

impl TreeExt for Value {
    fn get_path(&self, path: &Path) -> Option<&Value> {
        path.segments().iter().try_fold(self, step)
    }

    fn get_path_mut(&mut self, path: &Path) -> Option<&mut Value> {
        path.segments().iter().try_fold(self, step_mut)
    }

    fn set_path(&mut self, path: &Path, value: Value) -> Result<(), PathError> {
        let segments = path.segments();
        let Some((last, parents)) = segments.split_last() else {
            *self = value;
            return Ok(());
        };

        let mut node = self;
        for (depth, seg) in parents.iter().enumerate() {
            let next = &segments[depth + 1];
            if node.is_null() {
                *node = empty_for(seg);
            }
            node = match node {
                Value::Object(map) => map.entry(seg.as_key()).or_insert_with(|| empty_for(next)),
                Value::Array(items) => {
                    let Segment::Index(i) = seg else {
                        return Err(PathError::NotAContainer { path: path.prefix(depth + 1).to_string() });
                    };
                    if *i > items.len() {
                        return Err(PathError::IndexOutOfRange { path: path.prefix(depth).to_string(), index: *i });
                    }
                    if *i == items.len() {
                        items.push(empty_for(next));
                    }
                    &mut items[*i]
                }
                _ => return Err(PathError::NotAContainer { path: path.prefix(depth).to_string() }),
            };
            if node.is_null() {
                *node = empty_for(next);
            }
        }

        match node {
            Value::Object(map) => {
                map.insert(last.as_key(), value);
                Ok(())
            }
            Value::Array(items) => match last {
                Segment::Index(i) if *i < items.len() => {
                    items[*i] = value;
                    Ok(())
                }
                Segment::Index(i) if *i == items.len() => {
                    items.push(value);
                    Ok(())
                }
                Segment::Index(i) => Err(PathError::IndexOutOfRange { path: path.prefix(parents.len()).to_string(), index: *i }),
                Segment::Key(_) => Err(PathError::NotAContainer { path: path.to_string() }),
            },
            _ => Err(PathError::NotAContainer { path: path.prefix(parents.len()).to_string() }),
        }
    }

    fn delete_path(&mut self, path: &Path) -> Result<Option<Value>, PathError> {
        let Some((last, _)) = path.segments().split_last() else {
            return Err(PathError::Malformed { path: String::new(), reason: "cannot delete the root".into() });
        };
        let parent = match self.get_path_mut(&path.prefix(path.len() - 1)) {
            Some(p) => p,
            None => return Ok(None),
        };
        Ok(match (parent, last) {
            (Value::Object(map), seg) => map.shift_remove(&seg.as_key()),
            (Value::Array(items), Segment::Index(i)) if *i < items.len() => Some(items.remove(*i)),
            _ => None,
        })
    }

    fn is_empty_container(&self) -> bool {
        match self {
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        }
    }
}
