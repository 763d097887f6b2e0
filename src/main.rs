//! Movie Insights - profitability & rating rankings from movie metadata CSV
//!
//! Loads a movie table, reshapes it into long form and ranks genres,
//! contributors and director-actor pairs.

mod charts;
mod config;
mod data;
mod report;
mod stats;

use anyhow::{Context, Result};
use charts::ChartRenderer;
use clap::Parser;
use config::{AnalysisConfig, ReportSelection};
use data::{DataLoader, DataProcessor};
use report::{AnalysisReport, OutputFormat, ReportFormatter};
use stats::StatsCalculator;
use std::path::PathBuf;
use tracing::{debug, error, trace};
use tracing_subscriber::EnvFilter;

/// Rank genres, directors/actors and director-actor pairs from a movie metadata CSV
#[derive(Parser, Debug)]
#[command(name = "movie_insights", version)]
#[command(about = "Rank genres, directors/actors and director-actor pairs from movie metadata", long_about = None)]
struct Cli {
    /// Movie metadata CSV with a header row
    csv: PathBuf,

    /// Which ranking(s) to compute
    #[arg(long, value_enum, default_value_t = ReportSelection::All)]
    report: ReportSelection,

    /// Number of entries per ranking (overrides the config file)
    #[arg(short = 'n', long)]
    top: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// JSON config file with column names and ranking parameters
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Also write SVG bar charts into this directory
    #[arg(long)]
    chart_dir: Option<PathBuf>,

    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .init();

    debug!("movie_insights started with verbosity level: {}", verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AnalysisConfig::default(),
    }
    .with_top_n(cli.top);
    debug!("Effective config: {:?}", config);

    let mut loader = DataLoader::new();
    loader
        .load_csv(&cli.csv)
        .with_context(|| format!("loading {}", cli.csv.display()))?;
    trace!("Columns: {:?}", loader.get_columns());
    loader.require_columns(&config.columns.required_for(cli.report))?;

    let df = loader.get_dataframe().context("no data loaded")?;
    let tables = DataProcessor::prepare_tables(df, &config, cli.report)?;
    let rankings = StatsCalculator::compute_all_parallel(&tables, &config, cli.report);

    let source = loader
        .get_file_path()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let report = AnalysisReport {
        source,
        rows: loader.get_row_count(),
        top_n: config.top_n,
        profit_scale: config.profit_scale,
        rankings,
    };

    println!("{}", ReportFormatter::render(&report, cli.format)?);

    if let Some(dir) = &cli.chart_dir {
        ChartRenderer::render_report(&report, dir)?;
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        error!("Fatal error: {:#}", e);
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
