//! Neat — declutters Kubernetes resource documents.
//!
//! Passes, in order:
//! 1. Spec cleanup (kind-specific rule table)
//! 2. Pod cleanup (legacy service account field, optional token volumes)
//! 3. Metadata reduction (annotation rules, then name/namespace/labels/annotations)
//! 4. Status stripping
//! 5. Empty-subtree pruning (opt-in)
//!
//! A `List` document has each of its `items` cleaned independently; the
//! wrapper itself only gets metadata reduction.

pub mod config;
pub mod error;
pub mod metadata;
pub mod path;
pub mod pipeline;
pub mod pod;
pub mod prune;
pub mod rules;
pub mod status;
pub mod tree;

pub use config::{NeatConfig, RuleSpec};
pub use error::{NeatError, PathError, Result};
pub use path::{Path, Segment};
pub use pipeline::{Neat, NeatReport};
pub use rules::{Action, KindSelector, Phase, Rule, RuleStats, RuleTable};
pub use tree::TreeExt;
