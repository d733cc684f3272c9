//! Declarative rule table: which fields each resource kind loses.
//!
//! Rules are plain data consulted by the pipeline; adding a kind means
//! adding rows, never touching the pass sequence.

use crate::config::NeatConfig;
use crate::error::PathError;
use crate::metadata::{self, METADATA_FIELDS};
use crate::path::Path;
use crate::tree::TreeExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

/// Wildcard kind in rule data.
pub const ANY_KIND: &str = "*";

/// Which documents a rule applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KindSelector {
    Any,
    Kind(String),
}

impl KindSelector {
    pub fn parse(kind: &str) -> Self {
        if kind == ANY_KIND {
            Self::Any
        } else {
            Self::Kind(kind.to_string())
        }
    }

    /// Documents without a `kind` only match [`KindSelector::Any`].
    pub fn matches(&self, kind: Option<&str>) -> bool {
        match self {
            Self::Any => true,
            Self::Kind(k) => kind == Some(k.as_str()),
        }
    }
}

/// Stage of the pipeline a rule belongs to. Stages run in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Kind-specific spec cleanup.
    #[default]
    Spec,
    /// Pod-only cleanup (legacy service account field, scheduling).
    Pod,
    /// Header annotations, then the allow-list projection.
    Metadata,
    /// Observed state.
    Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Delete,
    /// Narrow the object at the path to these fields, in this order.
    Retain(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub kind: KindSelector,
    pub phase: Phase,
    pub path: String,
    pub action: Action,
    /// `path` parsed once at construction.
    target: Result<Path, PathError>,
}

impl Rule {
    fn new(kind: &str, phase: Phase, path: String, action: Action) -> Self {
        let target = Path::parse(&path);
        Self { kind: KindSelector::parse(kind), phase, path, action, target }
    }

    pub fn delete(kind: &str, phase: Phase, path: impl Into<String>) -> Self {
        Self::new(kind, phase, path.into(), Action::Delete)
    }

    pub fn retain(kind: &str, phase: Phase, path: impl Into<String>, fields: &[&str]) -> Self {
        let fields = fields.iter().map(|f| f.to_string()).collect();
        Self::new(kind, phase, path.into(), Action::Retain(fields))
    }

    /// The parsed target path, or why `path` did not parse.
    pub fn target(&self) -> Result<&Path, &PathError> {
        self.target.as_ref()
    }

    /// Applies the rule to `doc`. `Ok(false)` means the target was absent.
    pub fn apply(&self, doc: &mut Value) -> Result<bool, PathError> {
        let path = self.target.as_ref().map_err(Clone::clone)?;
        match &self.action {
            Action::Delete => Ok(doc.delete_path(path)?.is_some()),
            Action::Retain(fields) => Ok(doc.get_path_mut(path).is_some_and(|target| metadata::retain_fields(target, fields.as_slice()))),
        }
    }
}

/// Outcome counts of one pass over a rule set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleStats {
    pub applied: usize,
    pub skipped: usize,
}

/// Rows of the built-in table: (kind, phase, path).
const DEFAULT_DELETES: &[(&str, Phase, &str)] = &[
    (ANY_KIND, Phase::Spec, "spec.template.metadata.creationTimestamp"),
    ("Deployment", Phase::Spec, r"spec.template.metadata.annotations.kubectl\.kubernetes\.io/restartedAt"),
    ("Service", Phase::Spec, "spec.clusterIP"),
    ("Service", Phase::Spec, "spec.clusterIPs"),
    ("PersistentVolume", Phase::Spec, "spec.claimRef"),
    ("PersistentVolumeClaim", Phase::Spec, r"metadata.annotations.pv\.kubernetes\.io/bound-by-controller"),
    ("PersistentVolumeClaim", Phase::Spec, r"metadata.annotations.pv\.kubernetes\.io/bind-completed"),
    // Deprecated alias of serviceAccountName.
    ("Pod", Phase::Pod, "spec.serviceAccount"),
    (ANY_KIND, Phase::Metadata, r"metadata.annotations.kubectl\.kubernetes\.io/last-applied-configuration"),
    ("Deployment", Phase::Metadata, r"metadata.annotations.deployment\.kubernetes\.io/revision"),
    (ANY_KIND, Phase::Status, "status"),
];

/// Ordered collection of [`Rule`]s.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    /// A table with no rules.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in table.
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for (kind, phase, path) in DEFAULT_DELETES {
            table.push(Rule::delete(kind, *phase, *path));
        }
        table.push(Rule::retain(ANY_KIND, Phase::Metadata, "metadata", METADATA_FIELDS));
        table
    }

    /// The built-in table plus the rules `config` switches on.
    /// Configured extra rules run after the built-in ones of their phase,
    /// except that metadata extras run before the allow-list projection.
    pub fn with_config(config: &NeatConfig) -> Self {
        let mut table = Self::builtin();
        if config.strip_node_name {
            table.push(Rule::delete("Pod", Phase::Pod, "spec.nodeName"));
        }
        for extra in &config.extra_rules {
            let rule = Rule::delete(&extra.kind, extra.phase, extra.path.clone());
            if extra.phase == Phase::Metadata {
                table.insert_before_retain(rule);
            } else {
                table.push(rule);
            }
        }
        table
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    fn insert_before_retain(&mut self, rule: Rule) {
        let at = self
            .rules
            .iter()
            .position(|r| r.phase == rule.phase && matches!(r.action, Action::Retain(_)))
            .unwrap_or(self.rules.len());
        self.rules.insert(at, rule);
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Rules of `phase` that select `kind`, in table order.
    pub fn rules_for<'a>(&'a self, kind: Option<&'a str>, phase: Phase) -> impl Iterator<Item = &'a Rule> + 'a {
        self.rules.iter().filter(move |r| r.phase == phase && r.kind.matches(kind))
    }

    /// Applies every rule of `phase` for `kind`. Rule failures are
    /// absorbed: an absent target or a malformed path only counts as skipped.
    pub fn apply(&self, doc: &mut Value, kind: Option<&str>, phase: Phase) -> RuleStats {
        let mut stats = RuleStats::default();
        for rule in self.rules_for(kind, phase) {
            match rule.apply(doc) {
                Ok(true) => {
                    trace!(path = %rule.path, ?phase, "rule applied");
                    stats.applied += 1;
                }
                Ok(false) => {
                    debug!(path = %rule.path, kind = kind.unwrap_or(""), "rule target absent");
                    stats.skipped += 1;
                }
                Err(err) => {
                    debug!(path = %rule.path, kind = kind.unwrap_or(""), %err, "rule skipped");
                    stats.skipped += 1;
                }
            }
        }
        stats
    }
}
