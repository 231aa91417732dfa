use std::path::PathBuf;

use assay_tools::pipeline::{self, RunSummary};
use assay_tools::{Result, ToolError};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| ToolError::Logging(err.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Consolidate(args) => execute_consolidate(args),
    }
}

fn execute_consolidate(args: ConsolidateArgs) -> Result<()> {
    let output = pipeline::with_default_extension(&args.output);
    let summary = pipeline::consolidate(&args.input, &output)?;
    log_summary(&summary);

    if let Some(path) = &args.summary {
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(path, json)?;
    }
    Ok(())
}

fn log_summary(summary: &RunSummary) {
    for source in &summary.sources {
        info!(
            file = %source.file_name,
            plate_number = %source.plate_number,
            rows = source.rows,
            "consumed workbook"
        );
    }
    for (assay, count) in &summary.high_controls {
        info!(%assay, high_controls = count, "annotated assay sheet");
    }
    info!(
        output = %summary.output.display(),
        total_rows = summary.total_rows,
        skipped = summary.skipped.len(),
        "consolidation finished"
    );
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Consolidate plate-reader assay workbooks and flag high-control wells."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Merge every workbook in a folder into one workbook with a sheet per assay.
    Consolidate(ConsolidateArgs),
}

#[derive(clap::Args)]
struct ConsolidateArgs {
    /// Folder containing the plate workbooks.
    #[arg(long)]
    input: PathBuf,

    /// Output workbook path; `.xlsx` is appended when no extension is given.
    #[arg(long)]
    output: PathBuf,

    /// Optional path for a JSON summary of the run.
    #[arg(long)]
    summary: Option<PathBuf>,
}
