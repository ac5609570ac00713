//! Scrape orchestration.
//!
//! One run walks `Idle → Rendering → Extracting → Assembled → Closed`, or
//! `Rendering → Failed → Closed` when the page never loads. Rendering is the
//! only step that awaits; extraction and cover selection are synchronous
//! passes over the parsed page. The rendered page is owned by the run and its
//! lease is released exactly once on every path: explicitly after
//! extraction, or by drop when a render error or timeout unwinds the run.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::assemble::{self, RunStamp};
use crate::cover;
use crate::dom;
use crate::error::{Error, Result};
use crate::extractor::{self, PageContext};
use crate::options::Options;
use crate::platform;
use crate::render::{HttpRenderer, RenderedPage, Renderer};
use crate::result::{FailureKind, ScrapeLog, ScrapedTitleData, ScrapingResult};
use crate::url_utils;

/// Lifecycle of one scrape run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeState {
    Idle,
    /// Acquiring the rendered page.
    Rendering,
    /// Running the resolver, extractors and cover selector.
    Extracting,
    /// Result built.
    Assembled,
    /// Render error or timeout.
    Failed,
    /// Render resource released.
    Closed,
}

impl ScrapeState {
    /// Whether `self → next` is a legal transition.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        use ScrapeState::{Assembled, Closed, Extracting, Failed, Idle, Rendering};
        matches!(
            (self, next),
            (Idle, Rendering)
                | (Rendering, Extracting | Failed)
                | (Extracting, Assembled)
                | (Assembled | Failed, Closed)
        )
    }
}

impl fmt::Display for ScrapeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Mutable state of one run. Never shared between runs.
struct Run {
    state: ScrapeState,
    log: ScrapeLog,
    stamp: RunStamp,
    clock: Instant,
}

impl Run {
    fn new(url: &str) -> Self {
        Self {
            state: ScrapeState::Idle,
            log: ScrapeLog::new(),
            stamp: RunStamp::start(url),
            clock: Instant::now(),
        }
    }

    fn enter(&mut self, next: ScrapeState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {next}",
            self.state
        );
        debug!(from = %self.state, to = %next, "scrape state");
        self.state = next;
    }

    fn fail(mut self, kind: FailureKind, err: &Error) -> ScrapingResult {
        warn!(url = %self.stamp.url, error = %err, "scrape failed");
        self.log.push(format!("render failed: {err}"));
        self.enter(ScrapeState::Failed);
        self.enter(ScrapeState::Closed);
        assemble::failure(kind, err.to_string(), self.log.into_lines(), self.stamp, self.clock.elapsed())
    }
}

/// Scrapes title pages with a shared renderer.
///
/// Runs are independent; the only state shared between concurrent runs is
/// the renderer and the read-only platform registry.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use rs_storyscrape::render::FixtureRenderer;
/// use rs_storyscrape::{Options, Scraper};
///
/// let renderer = FixtureRenderer::new().with_page(
///     "https://example.org/title/1",
///     r#"<html><head><meta property="og:title" content="신의 탑"></head><body></body></html>"#,
/// );
/// let scraper = Scraper::new(Arc::new(renderer), Options::default());
///
/// let rt = tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap();
/// let result = rt.block_on(scraper.scrape("https://example.org/title/1"));
/// assert!(result.success);
/// ```
#[derive(Clone)]
pub struct Scraper {
    renderer: Arc<dyn Renderer>,
    options: Options,
}

impl fmt::Debug for Scraper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scraper")
            .field("renderer", &self.renderer.name())
            .field("options", &self.options)
            .finish()
    }
}

impl Scraper {
    #[must_use]
    pub fn new(renderer: Arc<dyn Renderer>, options: Options) -> Self {
        Self { renderer, options }
    }

    /// A scraper backed by [`HttpRenderer`].
    pub fn with_http(options: Options) -> Result<Self> {
        let renderer = HttpRenderer::new(&options)?;
        Ok(Self::new(Arc::new(renderer), options))
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Scrape one URL.
    ///
    /// Never fails: render errors, timeouts and a missing title come back as
    /// `success: false` results with a structured `error`.
    #[instrument(skip(self), fields(renderer = self.renderer.name()))]
    pub async fn scrape(&self, url: &str) -> ScrapingResult {
        let mut run = Run::new(url);
        run.enter(ScrapeState::Rendering);

        let target = match url_utils::parse_target(url) {
            Ok(target) => target,
            Err(err) => return run.fail(FailureKind::InvalidUrl, &err),
        };
        run.log.push(format!("rendering {target} via {}", self.renderer.name()));

        let page = match self.render(&target).await {
            Ok(page) => page,
            Err(err @ Error::RenderTimeout(_)) => return run.fail(FailureKind::RenderTimeout, &err),
            Err(err) => return run.fail(FailureKind::Render, &err),
        };
        run.log.push(format!(
            "rendered {} in {} ms",
            page.url,
            run.clock.elapsed().as_millis()
        ));
        for line in &page.console {
            run.log.push(format!("[console] {line}"));
        }

        run.enter(ScrapeState::Extracting);
        let data = extract_page(&page, &self.options, &mut run);

        run.enter(ScrapeState::Assembled);
        page.close();
        run.log.push("render resource released");
        run.enter(ScrapeState::Closed);

        let elapsed = run.clock.elapsed();
        match data {
            Some(data) => {
                info!(url, fields = data.extracted_fields().len(), "scrape complete");
                assemble::success(data, run.log.into_lines(), run.stamp, elapsed)
            }
            None => {
                warn!(url, "no title found");
                run.log.push("title_name_kr missing; result marked failed");
                assemble::failure(
                    FailureKind::MissingTitle,
                    "no title found on page",
                    run.log.into_lines(),
                    run.stamp,
                    elapsed,
                )
            }
        }
    }

    /// Scrape several URLs, at most `Options::concurrency` at a time.
    /// Results are returned in input order.
    pub async fn scrape_many<I, S>(&self, urls: I) -> Vec<ScrapingResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let limit = self.options.concurrency_limit();
        stream::iter(urls)
            .map(|url| async move { self.scrape(url.as_ref()).await })
            .buffered(limit)
            .collect()
            .await
    }

    /// Render under the configured timeout. Dropping the render future on
    /// timeout drops any lease it already holds.
    async fn render(&self, url: &Url) -> Result<RenderedPage> {
        let timeout = self.options.render_timeout;
        match tokio::time::timeout(timeout, self.renderer.render(url)).await {
            Ok(rendered) => rendered,
            Err(_) => Err(Error::RenderTimeout(timeout.as_millis())),
        }
    }
}

/// Parse the settled page and run every extractor and the cover selector.
fn extract_page(page: &RenderedPage, options: &Options, run: &mut Run) -> Option<ScrapedTitleData> {
    let profile = platform::resolve(&page.url);
    run.stamp.platform = Some(profile.key.to_string());
    run.log.push(format!("platform: {} ({})", profile.name, profile.key));

    let doc = dom::parse(&page.html);
    let ctx = PageContext::new(&doc, &page.url, profile);
    let extraction = extractor::extract_all(&ctx, &mut run.log);
    let cover = cover::select_cover(&doc, &page.url, &page.layout, profile, options, &mut run.log);

    assemble::title_data(extraction, cover)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::FixtureRenderer;

    #[test]
    fn test_state_machine_transitions() {
        use ScrapeState::{Assembled, Closed, Extracting, Failed, Idle, Rendering};

        assert!(Idle.can_transition_to(Rendering));
        assert!(Rendering.can_transition_to(Extracting));
        assert!(Rendering.can_transition_to(Failed));
        assert!(Extracting.can_transition_to(Assembled));
        assert!(Assembled.can_transition_to(Closed));
        assert!(Failed.can_transition_to(Closed));

        assert!(!Extracting.can_transition_to(Failed));
        assert!(!Idle.can_transition_to(Extracting));
        assert!(!Closed.can_transition_to(Rendering));
    }

    #[tokio::test]
    async fn test_invalid_url_is_a_structured_failure() {
        let renderer = Arc::new(FixtureRenderer::new());
        let scraper = Scraper::new(renderer.clone(), Options::default());

        let result = scraper.scrape("ftp://example.org/x").await;
        assert!(!result.success);
        assert_eq!(result.error.map(|e| e.kind), Some(FailureKind::InvalidUrl));
        assert_eq!(renderer.acquired(), 0);
    }

    #[tokio::test]
    async fn test_console_lines_are_prefixed() {
        let renderer = Arc::new(
            FixtureRenderer::new().with_page("https://example.org/t", "<html><body><h1>제목</h1></body></html>"),
        );
        let scraper = Scraper::new(renderer, Options::default());

        let result = scraper.scrape("https://example.org/t").await;
        assert!(result.logs.iter().any(|l| l.starts_with("[console] fixture")));
        assert_eq!(result.metadata.platform.as_deref(), Some("generic"));
    }

    #[tokio::test]
    async fn test_scrape_many_preserves_order() {
        let renderer = Arc::new(
            FixtureRenderer::new()
                .with_page("https://example.org/a", "<html><body><h1>A</h1></body></html>")
                .with_page("https://example.org/b", "<html><body><h1>B</h1></body></html>")
                .failing("https://example.org/c", "refused"),
        );
        let scraper = Scraper::new(renderer.clone(), Options { concurrency: 2, ..Options::default() });

        let results = scraper
            .scrape_many(["https://example.org/a", "https://example.org/c", "https://example.org/b"])
            .await;

        let titles: Vec<_> = results
            .iter()
            .map(|r| r.data.as_ref().map(|d| d.title_name_kr.clone()))
            .collect();
        assert_eq!(titles, vec![Some("A".to_string()), None, Some("B".to_string())]);
        assert_eq!(renderer.acquired(), 3);
        assert_eq!(renderer.released(), 3);
    }
}
