//! The `Neat` orchestrator: sequences the cleanup passes.

use crate::config::NeatConfig;
use crate::error::{NeatError, Result};
use crate::rules::{Phase, RuleStats, RuleTable};
use crate::{metadata, pod, prune, status};
use serde_json::Value;
use tracing::warn;

/// Kind of the collection wrapper.
pub const LIST_KIND: &str = "List";

/// Counters gathered while cleaning one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeatReport {
    /// Records cleaned, collection items included, the wrapper excluded.
    pub records: usize,
    /// Collection items passed through unmodified after a failure.
    pub items_failed: usize,
    pub rules_applied: usize,
    pub rules_skipped: usize,
    /// Empty containers removed by the pruner.
    pub pruned: usize,
}

impl NeatReport {
    fn add(&mut self, stats: RuleStats) {
        self.rules_applied += stats.applied;
        self.rules_skipped += stats.skipped;
    }
}

/// Document cleaning engine. Holds no per-call state, so one instance can
/// be shared across threads.
#[derive(Debug, Clone)]
pub struct Neat {
    config: NeatConfig,
    table: RuleTable,
}

impl Neat {
    pub fn new(config: NeatConfig) -> Self {
        let table = RuleTable::with_config(&config);
        Self { config, table }
    }

    /// Engine with a caller-built rule table.
    pub fn with_table(config: NeatConfig, table: RuleTable) -> Self {
        Self { config, table }
    }

    pub fn config(&self) -> &NeatConfig {
        &self.config
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Cleans a JSON document and serializes the result compactly.
    /// Only zero-length input is `EmptyInput`; blank text fails to parse.
    pub fn neat_str(&self, input: &str) -> Result<String> {
        if input.is_empty() {
            return Err(NeatError::EmptyInput);
        }
        let doc: Value = serde_json::from_str(input).map_err(|_| NeatError::invalid(input))?;
        let cleaned = self.neat_value(doc)?;
        Ok(serde_json::to_string(&cleaned)?)
    }

    /// Cleans an already decoded document.
    pub fn neat_value(&self, doc: Value) -> Result<Value> {
        self.neat_with_report(doc).map(|(doc, _)| doc)
    }

    pub fn neat_with_report(&self, mut doc: Value) -> Result<(Value, NeatReport)> {
        let mut report = NeatReport::default();
        self.neat_in_place(&mut doc, &mut report)?;
        Ok((doc, report))
    }

    /// Fails before touching `doc`, so a rejected document is never
    /// half-cleaned.
    fn neat_in_place(&self, doc: &mut Value, report: &mut NeatReport) -> Result<()> {
        if !doc.is_object() {
            return Err(NeatError::not_an_object(doc));
        }
        let kind = doc.get("kind").and_then(Value::as_str).map(str::to_owned);
        let kind = kind.as_deref();

        if kind == Some(LIST_KIND) {
            if let Some(Value::Array(items)) = doc.get_mut("items") {
                for (index, item) in items.iter_mut().enumerate() {
                    if let Err(err) = self.neat_in_place(item, report) {
                        warn!(index, %err, "list item left as is");
                        report.items_failed += 1;
                    }
                }
            }
            report.add(metadata::reduce(doc, &self.table, kind));
            return Ok(());
        }

        report.records += 1;
        report.add(self.table.apply(doc, kind, Phase::Spec));
        if kind == Some(pod::POD_KIND) {
            report.add(pod::clean(doc, &self.table, self.config.strip_token_volumes));
        }
        report.add(metadata::reduce(doc, &self.table, kind));
        report.add(status::strip(doc, &self.table, kind));
        if self.config.prune_empty {
            report.pruned += prune::prune(doc);
        }
        Ok(())
    }
}

impl Default for Neat {
    fn default() -> Self {
        Self::new(NeatConfig::default())
    }
}
