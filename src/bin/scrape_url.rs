//! Scrape one title page and print the result as JSON.
//!
//! ```text
//! scrape_url https://comic.naver.com/webtoon/list?titleId=183559
//! scrape_url --file saved/tower.html https://comic.naver.com/webtoon/list?titleId=183559
//! ```
//!
//! With `--file`, the saved HTML is served for the URL instead of fetching
//! it, so platform resolution still follows the URL.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use rs_storyscrape::render::FixtureRenderer;
use rs_storyscrape::telemetry::init_tracing;
use rs_storyscrape::{Options, Scraper};
use tracing::Level;

#[derive(Parser)]
#[command(name = "scrape_url")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract title metadata from a story/webtoon page", long_about = None)]
struct Cli {
    /// Title page URL
    url: String,

    /// Serve this saved HTML file instead of fetching the URL
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Render timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Settle delay after load, in milliseconds
    #[arg(long, default_value_t = 1500)]
    settle_ms: u64,

    /// Print compact JSON
    #[arg(long)]
    compact: bool,

    /// Emit diagnostics as JSON lines
    #[arg(long, env = "STORYSCRAPE_JSON_LOGS")]
    json_logs: bool,

    /// Enable debug diagnostics
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs, if cli.verbose { Level::DEBUG } else { Level::WARN });

    let options = Options {
        render_timeout: Duration::from_secs(cli.timeout),
        settle_delay: Duration::from_millis(cli.settle_ms),
        ..Options::default()
    };

    let scraper = match &cli.file {
        Some(path) => {
            let renderer = FixtureRenderer::from_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            Scraper::new(Arc::new(renderer), options)
        }
        None => Scraper::with_http(options).context("Failed to create HTTP renderer")?,
    };

    let result = scraper.scrape(&cli.url).await;

    let json = if cli.compact {
        serde_json::to_string(&result)?
    } else {
        serde_json::to_string_pretty(&result)?
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}").context("Failed to write result")?;

    Ok(())
}
