//! Page rendering capability.
//!
//! A [`Renderer`] turns a URL into a [`RenderedPage`]: the settled HTML, the
//! console lines produced while loading, and measured image geometry. The
//! page holds a [`PageLease`] on whatever resource produced it (a browser
//! tab, a connection slot); the lease is released exactly once, either by
//! [`RenderedPage::close`] or when the page is dropped on any other path.
//!
//! Implementations:
//! - [`http::HttpRenderer`]: plain HTTP fetch, no script execution
//! - [`fixture::FixtureRenderer`]: serves registered pages (offline replay, tests)

pub mod fixture;
pub mod http;

use std::fmt;

use async_trait::async_trait;
use url::Url;

use crate::error::Result;

pub use fixture::FixtureRenderer;
pub use http::HttpRenderer;

/// Rendered geometry of one `<img>`, in CSS pixels. Any measurement may be
/// missing when the renderer could not take it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImageBox {
    pub width: Option<f64>,
    pub height: Option<f64>,
    /// Offset of the image's top edge from the top of the document.
    pub top: Option<f64>,
}

impl ImageBox {
    /// A fully measured box.
    #[must_use]
    pub fn new(width: f64, height: f64, top: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            top: Some(top),
        }
    }
}

/// Measured layout of a rendered page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    /// One entry per `<img>` element, in document order.
    pub images: Vec<ImageBox>,
    /// Height of the viewport the page was rendered in.
    pub viewport_height: Option<f64>,
}

impl PageLayout {
    /// Layout for a renderer that measures nothing.
    #[must_use]
    pub fn unmeasured() -> Self {
        Self::default()
    }

    /// Geometry of the `index`-th `<img>` (document order).
    #[must_use]
    pub fn image(&self, index: usize) -> ImageBox {
        self.images.get(index).copied().unwrap_or_default()
    }
}

type ReleaseFn = Box<dyn FnOnce() + Send + 'static>;

/// Claim on the resource backing a rendered page.
///
/// The release callback runs at most once: on [`PageLease::release`] or on
/// drop, whichever comes first.
pub struct PageLease {
    release: Option<ReleaseFn>,
}

impl PageLease {
    /// A lease that runs `release` when given up.
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A lease with nothing to release.
    #[must_use]
    pub fn noop() -> Self {
        Self { release: None }
    }

    /// Give the resource back. Later calls (and the eventual drop) do nothing.
    pub fn release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }

    /// Whether the resource has not been released yet.
    #[must_use]
    pub fn is_held(&self) -> bool {
        self.release.is_some()
    }
}

impl Drop for PageLease {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for PageLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageLease").field("held", &self.is_held()).finish()
    }
}

/// A fully loaded page, owned by a single scrape run.
#[derive(Debug)]
pub struct RenderedPage {
    /// Final URL after redirects.
    pub url: Url,
    /// Settled document HTML.
    pub html: String,
    /// Console / loader lines, in order.
    pub console: Vec<String>,
    pub layout: PageLayout,
    lease: PageLease,
}

impl RenderedPage {
    #[must_use]
    pub fn new(url: Url, html: String, console: Vec<String>, layout: PageLayout, lease: PageLease) -> Self {
        Self {
            url,
            html,
            console,
            layout,
            lease,
        }
    }

    /// Release the backing resource now.
    pub fn close(mut self) {
        self.lease.release();
    }
}

/// Something that can load a URL into a [`RenderedPage`].
///
/// `render` may suspend for network I/O and a settle delay; callers bound it
/// with a timeout. Dropping the returned future must not leak the resource.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Load `url` and wait for it to settle.
    async fn render(&self, url: &Url) -> Result<RenderedPage>;

    /// Short name for logs.
    fn name(&self) -> &'static str {
        "renderer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_lease() -> (PageLease, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let lease = PageLease::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (lease, count)
    }

    #[test]
    fn test_lease_releases_once_on_explicit_release_then_drop() {
        let (mut lease, count) = counting_lease();
        lease.release();
        lease.release();
        assert!(!lease.is_held());
        drop(lease);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_lease_releases_on_drop() {
        let (lease, count) = counting_lease();
        drop(lease);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_page_close_releases_once() {
        let (lease, count) = counting_lease();
        let url = Url::parse("https://example.org/").expect("valid url");
        let page = RenderedPage::new(url, String::new(), Vec::new(), PageLayout::unmeasured(), lease);
        page.close();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_layout_lookup_defaults_to_unmeasured() {
        let layout = PageLayout {
            images: vec![ImageBox::new(200.0, 300.0, 120.0)],
            viewport_height: Some(800.0),
        };
        assert_eq!(layout.image(0).width, Some(200.0));
        assert_eq!(layout.image(5), ImageBox::default());
    }
}
