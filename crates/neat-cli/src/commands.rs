use anyhow::{bail, Context, Result};
use neat_core::{Neat, NeatConfig};
use neat_format::{neat_yaml_or_json, OutputFormat};
use std::ffi::OsStr;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

use crate::cli::Cli;

/// Builds the engine options from `--config` and the switch flags.
pub fn load_config(cli: &Cli) -> Result<NeatConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            NeatConfig::from_json(&text).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => NeatConfig::default(),
    };
    config.prune_empty |= cli.prune_empty;
    config.strip_token_volumes |= cli.strip_token_volumes;
    config.strip_node_name |= cli.strip_node_name;
    Ok(config)
}

fn read_input(file: &str) -> Result<String> {
    if file == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(Path::new(file)).with_context(|| format!("reading {file}"))
    }
}

/// Root command: neat a file or stdin.
pub fn neat_input(engine: &Neat, file: &str, format: OutputFormat) -> Result<String> {
    let input = read_input(file)?;
    debug!(file, bytes = input.len(), "read input");
    Ok(neat_yaml_or_json(&input, format, engine)?)
}

/// Argument vector for `kubectl get`. JSON is requested first so an
/// explicit `-o` among `args` still wins.
pub fn kubectl_args(args: &[String]) -> Vec<String> {
    let mut argv = vec!["get".to_string(), "-o".to_string(), "json".to_string()];
    argv.extend(args.iter().cloned());
    argv
}

/// Output format of `get`: JSON when the kubectl arguments ask for it,
/// otherwise the `-o` flag, otherwise YAML.
pub fn get_output_format(args: &[String], requested: Option<OutputFormat>) -> OutputFormat {
    let wants_json = args
        .iter()
        .any(|a| matches!(a.as_str(), "json" | "ojson" | "-ojson" | "--output=json" | "-o=json"));
    if wants_json {
        OutputFormat::Json
    } else {
        requested.unwrap_or(OutputFormat::Yaml)
    }
}

/// Runs kubectl with `argv` and returns its stdout.
pub fn run_kubectl<S: AsRef<OsStr> + fmt::Debug>(kubectl: &str, argv: &[S]) -> Result<String> {
    info!(kubectl, ?argv, "invoking kubectl");
    let output = Command::new(kubectl)
        .args(argv)
        .output()
        .with_context(|| format!("error invoking kubectl as {kubectl} {argv:?}"))?;
    if !output.status.success() {
        bail!(
            "error invoking kubectl as {kubectl} {argv:?}: {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    String::from_utf8(output.stdout).context("kubectl output is not utf-8")
}

/// `get` subcommand: run kubectl and neat its output.
pub fn get(engine: &Neat, kubectl: &str, args: &[String], requested: Option<OutputFormat>) -> Result<String> {
    let text = run_kubectl(kubectl, kubectl_args(args).as_slice())?;
    Ok(neat_yaml_or_json(&text, get_output_format(args, requested), engine)?)
}

pub fn version() -> String {
    format!("kubectl-neat version: {}", env!("CARGO_PKG_VERSION"))
}
