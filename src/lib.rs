//! # rs-storyscrape
//!
//! Title metadata extraction for Korean webtoon and web-novel platforms.
//!
//! Given a title page URL, the scraper renders the page, resolves the
//! platform profile for its host, runs one extractor per field plus a cover
//! image scorer, and returns a normalized [`ScrapingResult`] with a
//! confidence score and a log trail. A snapshot harness persists results
//! and diffs later runs against a golden set.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # async fn demo() {
//! let result = rs_storyscrape::scrape("https://comic.naver.com/webtoon/list?titleId=183559").await;
//! if let Some(data) = &result.data {
//!     println!("{} ({:.0}% confidence)", data.title_name_kr, result.confidence * 100.0);
//! }
//! # }
//! ```
//!
//! ## Offline
//!
//! Any [`render::Renderer`] can back a [`Scraper`]; [`render::FixtureRenderer`]
//! serves saved pages:
//!
//! ```rust
//! use std::sync::Arc;
//! use rs_storyscrape::render::FixtureRenderer;
//! use rs_storyscrape::{Options, Scraper};
//!
//! let html = r#"<html><body>
//!     <h1 class="title">신의 탑</h1>
//!     <span class="view-count">조회 13.7만</span>
//! </body></html>"#;
//! let renderer = FixtureRenderer::new().with_page("https://example.org/tower", html);
//! let scraper = Scraper::new(Arc::new(renderer), Options::default());
//!
//! let rt = tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap();
//! let result = rt.block_on(scraper.scrape("https://example.org/tower"));
//! let data = result.data.unwrap();
//! assert_eq!(data.title_name_kr, "신의 탑");
//! assert_eq!(data.views, Some(137_000));
//! ```

mod error;
mod options;
mod patterns;
mod result;

/// DOM helpers over `dom_query`.
pub mod dom;

/// Locale-aware abbreviated numerals ("13.7만", "1.2억").
pub mod magnitude;

/// Platform profiles and host resolution.
pub mod platform;

/// Generic selector rules used when a profile has no hint for a field.
pub mod selector;

/// Per-field extractors.
pub mod extractor;

/// Cover image scoring and selection.
pub mod cover;

/// Confidence scoring and result assembly.
pub mod assemble;

/// Rendering capability and its implementations.
pub mod render;

/// Per-URL orchestration and bounded batches.
pub mod scrape;

/// Snapshot persistence and regression comparison.
pub mod snapshot;

/// URL validation, resolution and domain keys.
pub mod url_utils;

/// Character encoding detection and transcoding.
pub mod encoding;

/// Tracing subscriber setup for binaries.
pub mod telemetry;

use std::time::Duration;

// Public API - re-exports
pub use error::{Error, Result};
pub use options::{Options, RegressionOptions};
pub use result::{
    AuthorRole, ExtractedField, FailureKind, FieldName, Format, ResultMetadata, ScrapeFailure, ScrapeLog,
    ScrapedTitleData, ScrapingResult,
};
pub use scrape::{ScrapeState, Scraper};

/// Scrape one URL over HTTP with default options.
///
/// Always returns a well-formed result; check `success`.
pub async fn scrape(url: &str) -> ScrapingResult {
    scrape_with_options(url, &Options::default()).await
}

/// Scrape one URL over HTTP with custom options.
pub async fn scrape_with_options(url: &str, options: &Options) -> ScrapingResult {
    match Scraper::with_http(options.clone()) {
        Ok(scraper) => scraper.scrape(url).await,
        Err(err) => assemble::failure(
            FailureKind::Render,
            err.to_string(),
            vec![format!("renderer unavailable: {err}")],
            assemble::RunStamp::start(url),
            Duration::ZERO,
        ),
    }
}
