//! Pod-only pass: the legacy `spec.serviceAccount` field, plus the
//! optional removal of auto-mounted service account token volumes.

use crate::rules::{Phase, RuleStats, RuleTable};
use serde_json::Value;

pub const POD_KIND: &str = "Pod";

/// Name prefix of volumes the token controller injects.
pub const TOKEN_VOLUME_PREFIX: &str = "default-token-";

/// Applies the [`Phase::Pod`] rules; with `strip_tokens` also drops the
/// injected token volumes and their mounts.
pub fn clean(doc: &mut Value, table: &RuleTable, strip_tokens: bool) -> RuleStats {
    let mut stats = table.apply(doc, Some(POD_KIND), Phase::Pod);
    if strip_tokens {
        stats.applied += strip_token_volumes(doc);
    }
    stats
}

fn is_token_entry(entry: &Value) -> bool {
    entry
        .get("name")
        .and_then(Value::as_str)
        .is_some_and(|name| name.starts_with(TOKEN_VOLUME_PREFIX))
}

fn retain_non_token(list: Option<&mut Value>) -> usize {
    let Some(Value::Array(items)) = list else {
        return 0;
    };
    let before = items.len();
    items.retain(|entry| !is_token_entry(entry));
    before - items.len()
}

/// Removes token volumes from `spec.volumes` and matching mounts from every
/// container and init container. Returns how many entries were removed.
pub fn strip_token_volumes(doc: &mut Value) -> usize {
    let Some(spec) = doc.get_mut("spec") else {
        return 0;
    };
    let mut removed = retain_non_token(spec.get_mut("volumes"));
    for group in ["initContainers", "containers"] {
        if let Some(Value::Array(containers)) = spec.get_mut(group) {
            for container in containers.iter_mut() {
                removed += retain_non_token(container.get_mut("volumeMounts"));
            }
        }
    }
    removed
}
