use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use session_analyzer::config::AnalyzerConfig;
use session_analyzer::data::loader::load_file;
use session_analyzer::report::SessionReport;

#[derive(Parser, Debug)]
#[command(
    name = "session_report",
    version,
    about = "Print every session view as JSON"
)]
struct Args {
    /// CSV file to analyze
    data: PathBuf,
    /// JSON file overriding view parameters
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = AnalyzerConfig::load_or_default(args.config.as_deref())?;
    let dataset = load_file(&args.data)
        .with_context(|| format!("Failed to load CSV {}", args.data.display()))?;
    log::info!(
        "Loaded {} rows with columns {:?}",
        dataset.len(),
        dataset.column_names
    );

    let report = SessionReport::build(&dataset, &config);
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("serializing report")?
    );
    Ok(())
}
