//! Export command implementation.

use anyhow::{Context, Result};
use logseq_export_core::{ExportConfig, ExportSummary, Exporter};
use std::path::Path;

/// Export the public pages of a logseq graph
pub fn export_graph(logseq_folder: &Path, output_folder: &Path, json: bool) -> Result<()> {
    tracing::info!("Exporting public pages from {:?}", logseq_folder);
    let config = ExportConfig::load(logseq_folder, output_folder)
        .context("Failed to load configuration")?;

    let summary = Exporter::new(config)
        .run()
        .with_context(|| format!("Failed to export {:?}", logseq_folder))?;

    print_summary(&summary, json)
}

fn print_summary(summary: &ExportSummary, json: bool) -> Result<()> {
    if json {
        let payload = serde_json::to_string_pretty(summary)?;
        println!("{}", payload);
        return Ok(());
    }

    println!(
        "Export complete: {} pages, {} assets",
        summary.pages, summary.assets
    );
    for missing in &summary.missing_assets {
        println!("- missing asset: {}", missing);
    }
    Ok(())
}
