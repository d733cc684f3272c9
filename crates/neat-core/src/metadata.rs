//! Metadata reducer: keep only the descriptive header fields.

use crate::rules::{Phase, RuleStats, RuleTable};
use serde_json::{Map, Value};

/// Header fields that survive reduction, in output order.
pub const METADATA_FIELDS: &[&str] = &["name", "namespace", "labels", "annotations"];

/// Replaces `target` with a new object holding only `fields` that it
/// already has. Returns false, leaving `target` untouched, when it is not
/// an object.
pub fn retain_fields<S: AsRef<str>>(target: &mut Value, fields: &[S]) -> bool {
    let Value::Object(map) = target else {
        return false;
    };
    let mut kept = Map::new();
    for field in fields {
        if let Some(v) = map.shift_remove(field.as_ref()) {
            kept.insert(field.as_ref().to_string(), v);
        }
    }
    *map = kept;
    true
}

/// Runs the metadata phase: annotation deletions for `kind`, then the
/// allow-list projection. A document without `metadata` is left alone.
pub fn reduce(doc: &mut Value, table: &RuleTable, kind: Option<&str>) -> RuleStats {
    table.apply(doc, kind, Phase::Metadata)
}
