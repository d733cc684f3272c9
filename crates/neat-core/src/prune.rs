//! Empty-subtree pruner.
//!
//! Finds every object or list with zero entries, then walks each finding
//! upward deleting levels that are empty at the time they are tested, so
//! removing a leaf never leaves an empty parent behind. Empty strings are
//! data and are kept. The root itself is never removed.

use crate::path::Path;
use crate::tree::TreeExt;
use serde_json::Value;
use tracing::trace;

/// Paths of all empty containers below the root, in depth-first order.
pub fn find_empty_paths(root: &Value) -> Vec<Path> {
    let mut found = Vec::new();
    walk(root, &Path::root(), &mut found);
    found
}

fn walk(node: &Value, path: &Path, found: &mut Vec<Path>) {
    if !path.is_empty() && node.is_empty_container() {
        found.push(path.clone());
        return;
    }
    match node {
        Value::Object(map) => {
            for (key, child) in map {
                walk(child, &path.child(key.as_str()), found);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                walk(child, &path.index(i), found);
            }
        }
        _ => {}
    }
}

/// Removes every empty container, cascading through ancestors.
/// Returns the number of containers deleted.
pub fn prune(root: &mut Value) -> usize {
    let mut deleted = 0;
    // Later findings first: a list element removed at a high index never
    // shifts the indices recorded for its lower siblings.
    for found in find_empty_paths(root).into_iter().rev() {
        for len in (1..=found.len()).rev() {
            let level = found.prefix(len);
            if !root.get_path(&level).is_some_and(|v| v.is_empty_container()) {
                break;
            }
            if let Ok(Some(_)) = root.delete_path(&level) {
                trace!(path = %level, "pruned empty container");
                deleted += 1;
            }
        }
    }
    deleted
}
