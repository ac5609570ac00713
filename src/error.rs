//! Error types for rs-storyscrape.
//!
//! This module defines the error types returned by rendering, extraction and
//! snapshot operations. `scrape` itself never surfaces these to its caller:
//! the orchestrator folds them into a `ScrapingResult`.

use std::path::PathBuf;

/// Error type for scraping operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested URL could not be parsed or is not http(s).
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The URL as given by the caller.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The page could not be loaded (unreachable host, bad status, navigation error).
    #[error("Render failed: {0}")]
    Render(String),

    /// The page did not finish loading within the configured timeout.
    #[error("Render timed out after {0} ms")]
    RenderTimeout(u128),

    /// A selector hint could not be parsed as CSS.
    #[error("Invalid selector '{0}'")]
    InvalidSelector(String),

    /// A single field extractor failed.
    #[error("Extraction of '{field}' failed: {reason}")]
    Extraction {
        /// Name of the field being extracted.
        field: &'static str,
        /// Failure description.
        reason: String,
    },

    /// Filesystem failure while reading or writing snapshots.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A snapshot file could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wrap an I/O error with the path it concerns.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for scraping operations.
pub type Result<T> = std::result::Result<T, Error>;
