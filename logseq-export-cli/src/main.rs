//! # logseq-export CLI
//!
//! Command-line interface for exporting public logseq pages as markdown.

mod commands;

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "logseq-export")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Root of the logseq graph (the folder containing pages/ and journals/)
    #[arg(long, env = "LOGSEQ_FOLDER")]
    logseq_folder: PathBuf,

    /// Folder where the transformed pages and assets are written
    #[arg(long, env = "LOGSEQ_EXPORT_OUTPUT")]
    output_folder: PathBuf,

    /// Print the export summary as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    commands::export_graph(&cli.logseq_folder, &cli.output_folder, cli.json)
}
