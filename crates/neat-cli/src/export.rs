//! `export` subcommand: dump neat manifests of whole kinds into a directory
//! tree, `<dest>/<namespace>/<kind>/<name>.yaml`.

use anyhow::{Context, Result};
use neat_core::Neat;
use neat_format::OutputFormat;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::commands::{get, run_kubectl};

/// Directory holding cluster-scoped kinds, beside the namespace directories.
pub const CLUSTER_DIR: &str = "Clusterd";

/// What to export and where.
#[derive(Debug, Clone)]
pub struct ExportPlan {
    pub kinds: Vec<String>,
    pub namespaces: Vec<String>,
    pub all_namespaces: bool,
    pub dest: PathBuf,
}

/// Counters of one export run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Manifests written.
    pub written: usize,
    /// Listings or fetches kubectl failed; each is logged and skipped.
    pub failed: usize,
}

/// Splits comma-separated arguments into their non-empty items.
pub fn split_list(args: &[String]) -> Vec<String> {
    args.iter()
        .flat_map(|a| a.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether `kind` is cluster-scoped according to `kubectl api-resources
/// --no-headers` output. Unknown kinds count as namespaced.
///
/// Rows are `NAME [SHORTNAMES] APIVERSION NAMESPACED KIND`; the short names
/// column may be blank, so NAMESPACED is read from the end of the row.
pub fn is_cluster_scoped(kind: &str, api_resources: &str) -> bool {
    let rows: Vec<Vec<&str>> = api_resources
        .lines()
        .map(|l| l.split_whitespace().collect::<Vec<_>>())
        .filter(|cols| cols.len() >= 3)
        .collect();
    let namespaced = |cols: &[&str]| cols[cols.len() - 2] == "true";

    // Exact name, short name or kind first, then a group-qualified name.
    let exact = rows.iter().find(|cols| {
        let n = cols.len();
        cols[..n - 2].contains(&kind) || cols[n - 1].eq_ignore_ascii_case(kind)
    });
    let found = exact.or_else(|| {
        rows.iter().find(|cols| cols[0].split('.').next() == kind.split('.').next())
    });
    found.is_some_and(|cols| !namespaced(cols.as_slice()))
}

/// Bare names from `kubectl get ... -o name` output (`namespace/default`
/// gives `default`).
pub fn parse_names(output: &str) -> Vec<String> {
    parse_names_full(output)
        .into_iter()
        .map(|l| l.rsplit('/').next().unwrap_or(l).to_string())
        .collect()
}

/// Non-blank `kind/name` lines of `-o name` output.
pub fn parse_names_full(output: &str) -> Vec<&str> {
    output.lines().map(str::trim).filter(|l| !l.is_empty()).collect()
}

fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))
}

/// Writes every object of `kind` in `namespace` to `dir`. kubectl failures
/// are logged and counted; filesystem failures are returned.
fn export_kind(engine: &Neat, kubectl: &str, kind: &str, namespace: &str, dir: &Path, summary: &mut ExportSummary) -> Result<()> {
    create_dir(dir)?;
    let listing = match run_kubectl(kubectl, &["get", kind, "-n", namespace, "-o", "name"]) {
        Ok(listing) => listing,
        Err(err) => {
            warn!(kind, namespace, "{err:#}");
            summary.failed += 1;
            return Ok(());
        }
    };
    for object in parse_names_full(&listing) {
        let args = [object.to_string(), "-n".to_string(), namespace.to_string()];
        let manifest = match get(engine, kubectl, &args, Some(OutputFormat::Yaml)) {
            Ok(manifest) => manifest,
            Err(err) => {
                warn!(object, namespace, "{err:#}");
                summary.failed += 1;
                continue;
            }
        };
        let name = object.rsplit('/').next().unwrap_or(object);
        let file = dir.join(format!("{name}.yaml"));
        fs::write(&file, manifest).with_context(|| format!("writing {}", file.display()))?;
        summary.written += 1;
    }
    info!(kind, namespace, total_written = summary.written, "exported kind");
    Ok(())
}

/// Runs an export and returns what was written.
pub fn export(engine: &Neat, kubectl: &str, plan: &ExportPlan) -> Result<ExportSummary> {
    let api_resources = run_kubectl(kubectl, &["api-resources", "--no-headers"])?;
    let cluster_dir = plan.dest.join(CLUSTER_DIR);
    create_dir(&cluster_dir)?;

    let namespaces = if plan.all_namespaces {
        parse_names(&run_kubectl(kubectl, &["get", "namespace", "-o", "name"])?)
    } else {
        plan.namespaces.clone()
    };

    let (cluster, namespaced): (Vec<&String>, Vec<&String>) =
        plan.kinds.iter().partition(|k| is_cluster_scoped(k, &api_resources));

    let mut summary = ExportSummary::default();
    for kind in cluster {
        export_kind(engine, kubectl, kind, "default", &cluster_dir.join(kind), &mut summary)?;
    }
    for ns in &namespaces {
        for kind in &namespaced {
            export_kind(engine, kubectl, kind, ns, &plan.dest.join(ns).join(kind), &mut summary)?;
        }
    }
    Ok(summary)
}
