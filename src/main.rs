//! Demographic Analyzer - census dataset statistics
//!
//! A CLI tool that loads a census-style CSV dataset and reports ten
//! descriptive statistics about race, age, education, income, working
//! hours, countries and occupations.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Error (bad arguments, unreadable or malformed dataset, undefined statistic)

mod analysis;
mod cli;
mod config;
mod dataset;
mod error;
mod models;
mod report;

use analysis::AnalysisSettings;
use anyhow::{Context, Result};
use chrono::Utc;
use cli::Args;
use config::{Config, CONFIG_FILE_NAME};
use models::{Report, ReportMetadata};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config is loaded before logging so `[general] verbose` can set the level
    let mut config = match Config::resolve(args.config.as_deref(), Path::new(".")) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(args.log_level(config.general.verbose));

    info!("Demographic Analyzer v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Configuration: {:?}", config);

    if let Err(e) = run_analysis(config) {
        error!("Analysis failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .demographics.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("Created {} with default settings.", CONFIG_FILE_NAME);
    Ok(())
}

/// Initialize logging at `level`.
///
/// Logs go to stderr so stdout carries only the report.
fn init_logging(level: Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Warning: a tracing subscriber was already installed");
    }
}

/// Run the analysis workflow.
fn run_analysis(config: Config) -> Result<()> {
    let start_time = Instant::now();

    let data_path = config.dataset.path.clone().context(
        "No dataset given. Pass --data FILE or set [dataset] path in .demographics.toml",
    )?;
    let delimiter = config.dataset.delimiter_byte()?;
    let settings = AnalysisSettings::from(&config.analysis);
    let target_country = settings.target_country.clone();
    let rich_label = settings.rich_label.clone();

    let summary = analysis::calculate_demographic_data(
        &data_path,
        delimiter,
        settings,
        config.general.print_report,
    )
    .with_context(|| format!("Failed to analyze {}", data_path.display()))?;

    let report = Report {
        metadata: ReportMetadata {
            dataset_path: data_path.display().to_string(),
            analysis_date: Utc::now(),
            total_records: summary.race_count.total(),
            target_country,
            rich_label,
            duration_seconds: start_time.elapsed().as_secs_f64(),
        },
        summary,
    };

    if let Some(ref output) = config.report.output {
        report::write_report(&report, config.report.format, output)?;
        info!(
            "Report saved to {} ({:?})",
            output.display(),
            config.report.format
        );
    }

    info!(
        "Analyzed {} records in {:.3}s",
        report.metadata.total_records, report.metadata.duration_seconds
    );

    Ok(())
}
