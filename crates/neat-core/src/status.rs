//! Status stripper.

use crate::rules::{Phase, RuleStats, RuleTable};
use serde_json::Value;

/// Drops the observed-state subtree (`status` in the built-in table).
pub fn strip(doc: &mut Value, table: &RuleTable, kind: Option<&str>) -> RuleStats {
    table.apply(doc, kind, Phase::Status)
}
