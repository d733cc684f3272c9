use clap::{Parser, Subcommand, ValueEnum};
use neat_format::OutputFormat;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "kubectl-neat",
    version,
    about = "Remove clutter from Kubernetes manifests",
    after_help = "Examples:\n  kubectl get pod mypod -o yaml | kubectl neat\n  kubectl neat -f ./my-pod.json -o yaml\n  kubectl neat get -- svc -n default myservice\n  kubectl neat export -n default deploy,sts -d ./manifests"
)]
pub struct Cli {
    #[arg(short = 'o', long, global = true, value_enum, help = "Output format; defaults to the input's format")]
    pub output: Option<Format>,
    #[arg(short = 'f', long, default_value = "-", help = "File to neat, or - to read from stdin")]
    pub file: String,
    #[arg(long, global = true, help = "JSON file with engine options")]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, help = "Remove empty objects and lists")]
    pub prune_empty: bool,
    #[arg(long, global = true, help = "Remove default-token-* volumes and mounts from Pods")]
    pub strip_token_volumes: bool,
    #[arg(long, global = true, help = "Remove spec.nodeName from Pods")]
    pub strip_node_name: bool,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a manifest with `kubectl get` and neat it.
    Get {
        #[arg(long, env = "KUBECTL", default_value = "kubectl", help = "kubectl binary to invoke")]
        kubectl: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, help = "Arguments passed to kubectl get")]
        args: Vec<String>,
    },
    /// Export every object of the given kinds as neat YAML files.
    Export {
        #[arg(short = 'n', long, default_value = "default", help = "Namespaces to export, comma-separated")]
        namespace: String,
        #[arg(short = 'A', long, help = "Export from every namespace")]
        all_namespaces: bool,
        #[arg(short = 'd', long, default_value = "manifests", help = "Directory to write manifests into")]
        dest_dir: PathBuf,
        #[arg(long, env = "KUBECTL", default_value = "kubectl", help = "kubectl binary to invoke")]
        kubectl: String,
        #[arg(required = true, help = "Kinds to export, e.g. deploy sts or deploy,sts")]
        kinds: Vec<String>,
    },
    /// Print the version.
    Version,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Yaml,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Json => OutputFormat::Json,
            Format::Yaml => OutputFormat::Yaml,
        }
    }
}
