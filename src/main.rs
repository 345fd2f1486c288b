use anyhow::Result;
use clap::{ArgAction, Parser};
use colored::*;
use geodiff::presentation::job_summary::MarkdownReporter;
use geodiff::{init_tracing, render_outputs, AppConfig, LogLevel, OutputFormat, Reporter};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "geodiff-report",
    about = "Compare two GeoPackage / SQLite files and report row-level changes."
)]
struct Cli {
    /// Base file to compare from.
    base_file: PathBuf,

    /// File to compare against the base.
    compare_file: PathBuf,

    /// `json` or `summary`. Overrides `output.format` from config.
    #[arg(short = 'f', long)]
    output_format: Option<OutputFormat>,

    /// Whether to also write a job summary. Overrides `output.summary`.
    #[arg(long, action = ArgAction::Set)]
    summary: Option<bool>,

    /// Markdown file the job summary is appended to.
    #[arg(long)]
    summary_file: Option<PathBuf>,

    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(if cli.quiet {
        LogLevel::Error
    } else if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    });

    let cfg =
        AppConfig::load(cli.config.as_deref())?.with_overrides(cli.output_format, cli.summary);

    let result = geodiff::compare_files(&cfg, &cli.base_file, &cli.compare_file).await?;
    let outputs = render_outputs(&result, cfg.output.format)?;

    if cfg.output.summary {
        if let Some(path) = &cli.summary_file {
            MarkdownReporter::new(path).report(&result)?;
        }
    }

    println!("{}", outputs.diff_result);

    if result.has_changes() {
        eprintln!(
            "{} {} change(s) across {} table(s)",
            "●".yellow(),
            result.total_changes().to_string().bold(),
            result.table_summaries().len()
        );
    } else {
        eprintln!("{}", "✓ No changes detected.".green());
    }
    eprintln!("has_changes={}", outputs.has_changes);

    Ok(())
}
