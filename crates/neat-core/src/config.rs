use crate::rules::{Phase, ANY_KIND};
use serde::{Deserialize, Serialize};

/// Engine options. Every switch defaults to off, which gives the
/// classic cleanup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeatConfig {
    /// Remove empty objects and lists after the other passes.
    pub prune_empty: bool,
    /// Drop `default-token-*` volumes and mounts from Pods.
    pub strip_token_volumes: bool,
    /// Drop `spec.nodeName` from Pods.
    pub strip_node_name: bool,
    /// Additional delete rules appended to the built-in table.
    pub extra_rules: Vec<RuleSpec>,
}

/// A user-supplied delete rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    #[serde(default = "any_kind")]
    pub kind: String,
    #[serde(default)]
    pub phase: Phase,
    pub path: String,
}

fn any_kind() -> String {
    ANY_KIND.to_string()
}

impl NeatConfig {
    pub fn from_json(text: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
