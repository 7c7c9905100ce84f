//! gnucash-report - Generate CSV reports from a GNUCash book.
//!
//! # Usage
//!
//! ```bash
//! gnucash-report -c reports.ini
//! gnucash-report --config reports.ini --verbose
//! ```
//!
//! Every enabled report is built in memory first. Output files are only
//! written once all of them succeeded, so a failing run leaves no partial
//! output behind.

use anyhow::{Context, Result};
use clap::Parser;
use gnucash_report_core::LedgerIndex;
use gnucash_report_engine::{
    category_table, AccountPaths, EngineError, ReportAssembler, ReportBuilder, Table,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, Layout, ReportConfig};

/// Create simple asset balance reports from an uncompressed GNUCash file.
#[derive(Parser, Debug)]
#[command(name = "gnucash-report")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file naming the book and the reports to build
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,

    /// Show debug output while running
    #[arg(short, long)]
    verbose: bool,
}

/// Main entry point for the report command.
pub fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = Config::load(&args.config)
        .with_context(|| format!("invalid configuration {}", args.config.display()))?;
    init_logging(args.verbose || config.verbose);

    let written = run_config(&config)?;
    for path in &written {
        tracing::info!(path = %path.display(), "wrote report");
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the book named by `config`, build every enabled report and write the
/// CSV files. Returns the paths written, in report order.
pub fn run_config(config: &Config) -> Result<Vec<PathBuf>> {
    let ledger = gnucash_report_loader::load(&config.input)
        .with_context(|| format!("failed to load {}", config.input.display()))?;
    let index = LedgerIndex::new(&ledger);

    let tables = config
        .reports
        .iter()
        .map(|report| {
            build_table(&index, report, config.strict)
                .map(|table| (report.output.clone(), table))
                .with_context(|| format!("failed to build {} report", report.kind))
        })
        .collect::<Result<Vec<_>>>()?;

    for (path, table) in &tables {
        write_csv(path, table)?;
    }
    Ok(tables.into_iter().map(|(path, _)| path).collect())
}

/// Build the table for one report.
///
/// In strict mode an account path that does not resolve is an error;
/// otherwise it is skipped with a warning.
pub fn build_table(
    index: &LedgerIndex<'_>,
    report: &ReportConfig,
    strict: bool,
) -> Result<Table, EngineError> {
    let mut paths = AccountPaths::resolve(index, &report.accounts);
    if strict {
        paths = paths.require_verified()?;
    }
    let excluded = AccountPaths::resolve(index, &report.exclude);

    let reports = ReportBuilder::new(index, report.kind)
        .with_excluded(&excluded)
        .build(&paths, &report.dates)?;
    tracing::debug!(
        report = %report.kind,
        rows = reports.len(),
        trees = paths.resolved().count(),
        "report built"
    );

    Ok(match &report.layout {
        Layout::Pivot(depth) => ReportAssembler::new(depth.clone()).assemble(&reports),
        Layout::Category => category_table(&reports, index),
    })
}

/// Write `table` as CSV, creating the parent directory if needed.
pub fn write_csv(path: &Path, table: &Table) -> Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory {}", dir.display()))?;
    }

    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for record in table.records() {
        writer
            .write_record(record.iter().map(|cell| cell.as_deref().unwrap_or_default()))
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
