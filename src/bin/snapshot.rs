//! Snapshot regression harness.
//!
//! ## Commands
//!
//! - `run`: scrape a URL list and write snapshots into `<out>/<stamp>/`
//! - `compare`: diff a run directory against a golden directory
//!
//! `compare` exits 0 when nothing regressed, 1 on any must-match
//! difference or missing domain, and 2 on usage or I/O errors.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rs_storyscrape::snapshot::regression::{compare_dirs, SummaryField};
use rs_storyscrape::snapshot::Harness;
use rs_storyscrape::telemetry::init_tracing;
use rs_storyscrape::{Options, RegressionOptions, Scraper};
use tracing::{info, Level};

const EXIT_REGRESSION: u8 = 1;
const EXIT_USAGE: u8 = 2;

#[derive(Parser)]
#[command(name = "snapshot")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Snapshot regression harness for the title scraper", long_about = None)]
struct Cli {
    /// Enable debug diagnostics
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit diagnostics as JSON lines
    #[arg(long, global = true, env = "STORYSCRAPE_JSON_LOGS")]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape every URL and write result/log snapshots
    Run {
        /// File with one URL per line (`#` starts a comment)
        #[arg(short, long)]
        urls: Option<PathBuf>,

        /// URLs given directly
        #[arg(value_name = "URL")]
        targets: Vec<String>,

        /// Root directory; the run goes into `<out>/<stamp>/`
        #[arg(short, long, default_value = "snapshots")]
        out: PathBuf,

        /// URLs scraped at once
        #[arg(short, long, default_value_t = 1)]
        concurrency: usize,

        /// Render timeout in seconds
        #[arg(long, default_value_t = 30)]
        timeout: u64,
    },

    /// Compare a run directory against golden snapshots
    Compare {
        /// Golden snapshot directory
        golden: PathBuf,

        /// Current run directory
        current: PathBuf,

        /// Fields whose difference is a regression
        #[arg(long, value_delimiter = ',', default_value = "title,image,format")]
        must_match: Vec<SummaryField>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.json_logs, if cli.verbose { Level::DEBUG } else { Level::INFO });

    let outcome = match cli.command {
        Commands::Run {
            urls,
            targets,
            out,
            concurrency,
            timeout,
        } => cmd_run(urls.as_deref(), targets, &out, concurrency, timeout).await,
        Commands::Compare {
            golden,
            current,
            must_match,
        } => cmd_compare(&golden, &current, must_match),
    };

    match outcome {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(EXIT_USAGE)
        }
    }
}

/// Scrape the URL list into a fresh run directory.
async fn cmd_run(
    list: Option<&Path>,
    mut targets: Vec<String>,
    out: &Path,
    concurrency: usize,
    timeout: u64,
) -> Result<ExitCode> {
    if let Some(list) = list {
        targets.extend(read_url_list(list)?);
    }
    if targets.is_empty() {
        bail!("no URLs given (pass URLs or --urls <file>)");
    }

    let options = Options {
        render_timeout: Duration::from_secs(timeout),
        concurrency,
        ..Options::default()
    };
    let scraper = Scraper::with_http(options).context("Failed to create HTTP renderer")?;
    let harness = Harness::new(scraper, out).with_concurrency(concurrency);

    info!(urls = targets.len(), out = %out.display(), "Starting snapshot run");
    let report = harness
        .run(&targets)
        .await
        .with_context(|| format!("Failed to create run directory under {}", out.display()))?;

    for item in &report.items {
        println!("{item}");
    }
    let failed = report.failures().count();
    println!(
        "{} URL(s), {} snapshot(s) written, {failed} failed -> {}",
        report.items.len(),
        report.items.len() - failed,
        report.dir.display()
    );

    Ok(ExitCode::SUCCESS)
}

/// Diff two snapshot directories and print the per-domain report.
fn cmd_compare(golden: &Path, current: &Path, must_match: Vec<SummaryField>) -> Result<ExitCode> {
    let options = RegressionOptions { must_match };
    let report = compare_dirs(golden, current, &options)
        .with_context(|| format!("Failed to compare {} with {}", golden.display(), current.display()))?;

    println!("{}", report.render());

    if report.has_regression() {
        Ok(ExitCode::from(EXIT_REGRESSION))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn read_url_list(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
