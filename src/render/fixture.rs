//! Fixture renderer: serves pre-registered pages.
//!
//! Used for offline replay of saved pages and in tests. Every render takes
//! a lease before doing anything else, so the acquire/release counters show
//! whether a caller released the page on every path, including failures and
//! timeouts.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use super::{PageLayout, PageLease, RenderedPage, Renderer};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
enum Behavior {
    Serve { html: String, layout: PageLayout },
    Fail(String),
    Hang,
}

/// Renderer answering from an in-memory table of pages.
///
/// # Example
///
/// ```rust
/// use rs_storyscrape::render::FixtureRenderer;
///
/// let renderer = FixtureRenderer::new()
///     .with_page("https://example.org/title/1", "<html><body><h1>신의 탑</h1></body></html>")
///     .failing("https://example.org/down", "connection refused");
/// assert_eq!(renderer.acquired(), 0);
/// ```
#[derive(Debug, Default)]
pub struct FixtureRenderer {
    pages: HashMap<String, Behavior>,
    fallback: Option<Behavior>,
    acquired: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
}

fn key(url: &str) -> String {
    Url::parse(url.trim()).map_or_else(|_| url.trim().to_string(), |u| u.to_string())
}

impl FixtureRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for `url` with no measured layout.
    #[must_use]
    pub fn with_page(self, url: &str, html: impl Into<String>) -> Self {
        self.with_layout(url, html, PageLayout::unmeasured())
    }

    /// Serve `html` for `url` with measured image geometry.
    #[must_use]
    pub fn with_layout(mut self, url: &str, html: impl Into<String>, layout: PageLayout) -> Self {
        self.pages.insert(
            key(url),
            Behavior::Serve {
                html: html.into(),
                layout,
            },
        );
        self
    }

    /// Fail renders of `url` with a navigation error.
    #[must_use]
    pub fn failing(mut self, url: &str, reason: impl Into<String>) -> Self {
        self.pages.insert(key(url), Behavior::Fail(reason.into()));
        self
    }

    /// Never finish rendering `url`.
    #[must_use]
    pub fn hanging(mut self, url: &str) -> Self {
        self.pages.insert(key(url), Behavior::Hang);
        self
    }

    /// Serve `html` for every URL without its own entry.
    #[must_use]
    pub fn serving_any(mut self, html: impl Into<String>) -> Self {
        self.fallback = Some(Behavior::Serve {
            html: html.into(),
            layout: PageLayout::unmeasured(),
        });
        self
    }

    /// Serve a saved HTML file for every URL.
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
        let html = crate::encoding::transcode_to_utf8(&bytes, None);
        Ok(Self::new().serving_any(html))
    }

    /// Number of leases handed out.
    #[must_use]
    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    /// Number of leases given back.
    #[must_use]
    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    fn acquire(&self) -> PageLease {
        self.acquired.fetch_add(1, Ordering::SeqCst);
        let released = Arc::clone(&self.released);
        PageLease::new(move || {
            released.fetch_add(1, Ordering::SeqCst);
        })
    }
}

#[async_trait]
impl Renderer for FixtureRenderer {
    async fn render(&self, url: &Url) -> Result<RenderedPage> {
        let lease = self.acquire();

        let behavior = self
            .pages
            .get(&key(url.as_str()))
            .or(self.fallback.as_ref())
            .cloned()
            .ok_or_else(|| Error::Render(format!("no fixture registered for {url}")))?;

        match behavior {
            Behavior::Serve { html, layout } => {
                let console = vec![format!("fixture {url} ({} bytes)", html.len())];
                Ok(RenderedPage::new(url.clone(), html, console, layout, lease))
            }
            Behavior::Fail(reason) => Err(Error::Render(reason)),
            Behavior::Hang => {
                std::future::pending::<()>().await;
                drop(lease);
                Err(Error::Render(format!("{url} never settled")))
            }
        }
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
