use anyhow::Result;
use clap::Parser;
use neat_core::Neat;
use neat_format::OutputFormat;
use std::io;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod commands;
mod export;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    // stdout carries the manifest only
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_writer(io::stderr).with_env_filter(filter).with_target(false).init();

    let cli = Cli::parse();
    let requested = cli.output.map(OutputFormat::from);
    let engine = Neat::new(commands::load_config(&cli)?);

    let out = match &cli.command {
        None => commands::neat_input(&engine, &cli.file, requested.unwrap_or_default())?,
        Some(Commands::Get { kubectl, args }) => commands::get(&engine, kubectl, args, requested)?,
        Some(Commands::Export { namespace, all_namespaces, dest_dir, kubectl, kinds }) => {
            let plan = export::ExportPlan {
                kinds: export::split_list(kinds),
                namespaces: export::split_list(std::slice::from_ref(namespace)),
                all_namespaces: *all_namespaces,
                dest: dest_dir.clone(),
            };
            let summary = export::export(&engine, kubectl, &plan)?;
            format!("exported {} manifests to {}, {} skipped\n", summary.written, dest_dir.display(), summary.failed)
        }
        Some(Commands::Version) => commands::version() + "\n",
    };
    print!("{out}");
    Ok(())
}
