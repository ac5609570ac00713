//! HTTP renderer.
//!
//! Fetches the document over HTTP(S), decodes it to UTF-8 and waits a fixed
//! settle delay. It does not execute scripts or measure layout; pages that
//! build their content client-side need a script-capable [`Renderer`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tokio::sync::Semaphore;
use tracing::{debug, warn};
use url::Url;

use super::{PageLayout, PageLease, RenderedPage, Renderer};
use crate::encoding::transcode_to_utf8;
use crate::error::{Error, Result};
use crate::options::Options;

/// Renderer backed by a shared `reqwest` client.
///
/// At most `Options::concurrency` pages are held at once; each rendered page
/// leases one slot until it is closed or dropped.
pub struct HttpRenderer {
    client: reqwest::Client,
    settle_delay: Duration,
    slots: Arc<Semaphore>,
}

impl HttpRenderer {
    /// Build a renderer from scrape options.
    pub fn new(options: &Options) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(options.user_agent.clone())
            .timeout(options.render_timeout)
            .build()
            .map_err(|e| Error::Render(format!("failed to create HTTP client: {e}")))?;

        Ok(Self::with_client(client, options))
    }

    /// Use a preconfigured client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, options: &Options) -> Self {
        Self {
            client,
            settle_delay: options.settle_delay,
            slots: Arc::new(Semaphore::new(options.concurrency_limit())),
        }
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn render(&self, url: &Url) -> Result<RenderedPage> {
        let permit = Arc::clone(&self.slots)
            .acquire_owned()
            .await
            .map_err(|_| Error::Render("renderer is shut down".to_string()))?;
        let lease = PageLease::new(move || drop(permit));

        debug!(url = %url, "HTTP fetch starting");
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "HTTP request failed");
            Error::Render(format!("GET {url} failed: {e}"))
        })?;

        let status = response.status();
        let final_url = response.url().clone();
        if !status.is_success() {
            return Err(Error::Render(format!("GET {url} -> {status}")));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Render(format!("reading body of {url} failed: {e}")))?;

        let html = transcode_to_utf8(&bytes, content_type.as_deref());
        let mut console = vec![format!("GET {final_url} -> {} ({} bytes)", status.as_u16(), bytes.len())];
        if final_url != *url {
            console.push(format!("redirected from {url}"));
        }

        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        Ok(RenderedPage::new(final_url, html, console, PageLayout::unmeasured(), lease))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
