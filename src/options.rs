//! Configuration options for scraping and regression checks.
//!
//! `Options` controls rendering and cover-image scoring thresholds.
//! `RegressionOptions` controls which summary fields must match between a
//! golden snapshot and a later run.

use std::time::Duration;

use crate::snapshot::regression::SummaryField;

/// Configuration options for a scrape run.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use rs_storyscrape::Options;
///
/// let options = Options {
///     render_timeout: Duration::from_secs(10),
///     concurrency: 2,
///     ..Options::default()
/// };
/// assert_eq!(options.min_image_size, 150.0);
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Upper bound on the time spent acquiring a rendered page.
    ///
    /// The render resource is released and the run reports a render
    /// failure when this elapses.
    ///
    /// Default: 30 seconds
    pub render_timeout: Duration,

    /// Fixed delay after load so late-loading content can settle.
    ///
    /// Default: 1.5 seconds
    pub settle_delay: Duration,

    /// Maximum number of runs rendering at the same time in `scrape_many`.
    ///
    /// Values below 1 are treated as 1.
    ///
    /// Default: `4`
    pub concurrency: usize,

    /// Minimum rendered width and height (px) for a cover candidate.
    ///
    /// Default: `150.0`
    pub min_image_size: f64,

    /// Height of the primary viewport (px) used for the position band.
    ///
    /// Default: `900.0`
    pub viewport_height: f64,

    /// Height of the top page chrome (px); images starting above it are
    /// outside the position band.
    ///
    /// Default: `60.0`
    pub chrome_height: f64,

    /// Rendered-area band (px²) in which the area bonus applies.
    ///
    /// Default: `(22_500.0, 640_000.0)`
    pub area_band: (f64, f64),

    /// How many ancestors are inspected for cover/content container hints.
    ///
    /// Default: `6`
    pub max_ancestor_depth: usize,

    /// User agent sent by the HTTP renderer.
    pub user_agent: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            render_timeout: Duration::from_secs(30),
            settle_delay: Duration::from_millis(1500),
            concurrency: 4,
            min_image_size: 150.0,
            viewport_height: 900.0,
            chrome_height: 60.0,
            area_band: (22_500.0, 640_000.0),
            max_ancestor_depth: 6,
            user_agent: concat!(
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) ",
                "Chrome/122.0.0.0 Safari/537.36"
            )
            .to_string(),
        }
    }
}

impl Options {
    /// Effective concurrency limit (never zero).
    #[must_use]
    pub fn concurrency_limit(&self) -> usize {
        self.concurrency.max(1)
    }
}

/// Which summary fields a regression comparison enforces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegressionOptions {
    /// Fields whose change between golden and current is a regression.
    /// All other summary fields are advisory.
    ///
    /// Default: title, image, format
    pub must_match: Vec<SummaryField>,
}

impl Default for RegressionOptions {
    fn default() -> Self {
        Self {
            must_match: vec![SummaryField::Title, SummaryField::Image, SummaryField::Format],
        }
    }
}

impl RegressionOptions {
    /// Whether a difference in `field` fails the comparison.
    #[must_use]
    pub fn is_must_match(&self, field: SummaryField) -> bool {
        self.must_match.contains(&field)
    }
}
