//! Confidence scoring and result assembly.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::extractor::Extraction;
use crate::platform::REGISTRY_VERSION;
use crate::result::{
    FailureKind, ScrapeFailure, ScrapedTitleData, ResultMetadata, ScrapingResult,
};

/// `<crate>/<version>` stamped into every result.
pub const ENGINE_VERSION: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Fields a complete record is expected to have. Confidence is the share of
/// this list that is populated; it does not depend on which fields a
/// particular page happened to offer.
pub const EXPECTED_FIELDS: &[ExpectedField] = &[
    ExpectedField::Title,
    ExpectedField::Image,
    ExpectedField::Genre,
    ExpectedField::Format,
    ExpectedField::Authorship,
    ExpectedField::Views,
];

/// One entry of the confidence checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedField {
    Title,
    Image,
    Genre,
    Format,
    /// Any of writer, illustrator, original author.
    Authorship,
    Views,
}

impl ExpectedField {
    fn is_present(self, data: &ScrapedTitleData) -> bool {
        match self {
            Self::Title => !data.title_name_kr.is_empty(),
            Self::Image => data.title_image.is_some(),
            Self::Genre => data.genre.is_some(),
            Self::Format => data.format.is_some(),
            Self::Authorship => data.has_authorship(),
            Self::Views => data.views.is_some(),
        }
    }
}

/// Fraction of [`EXPECTED_FIELDS`] populated in `data`, in `[0, 1]`.
///
/// ```
/// use rs_storyscrape::assemble::confidence;
/// use rs_storyscrape::ScrapedTitleData;
///
/// let data = ScrapedTitleData {
///     title_name_kr: "신의 탑".to_string(),
///     views: Some(137_000),
///     ..ScrapedTitleData::default()
/// };
/// assert!((confidence(&data) - 2.0 / 6.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn confidence(data: &ScrapedTitleData) -> f64 {
    let found = EXPECTED_FIELDS.iter().filter(|f| f.is_present(data)).count();
    (found as f64 / EXPECTED_FIELDS.len() as f64).clamp(0.0, 1.0)
}

/// Build the title record from extractor outcomes and the selected cover.
///
/// Returns `None` when the required title is absent.
#[must_use]
pub fn title_data(extraction: Extraction, cover: Option<String>) -> Option<ScrapedTitleData> {
    let title_name_kr = extraction.title.value.filter(|t| !t.trim().is_empty())?;

    Some(ScrapedTitleData {
        title_name_kr,
        title_name_en: extraction.title_en.value,
        author: extraction.author.value,
        illustrator: extraction.illustrator.value,
        original_author: extraction.original_author.value,
        genre: extraction.genre.value,
        format: extraction.format.value,
        chapter_count: extraction.chapter_count.value,
        is_completed: extraction.is_completed.value,
        title_image: cover,
        views: extraction.views.value,
        tags: extraction.tags.value.filter(|tags| !tags.is_empty()),
        age_rating: extraction.age_rating.value,
        content_provider: extraction.content_provider.value,
        description: extraction.description.value,
    })
}

/// Run provenance, filled in as the run progresses.
#[derive(Debug, Clone)]
pub struct RunStamp {
    pub url: String,
    pub started: DateTime<Utc>,
    pub platform: Option<String>,
}

impl RunStamp {
    #[must_use]
    pub fn start(url: &str) -> Self {
        Self {
            url: url.to_string(),
            started: Utc::now(),
            platform: None,
        }
    }

    fn metadata(self, elapsed: Duration) -> ResultMetadata {
        ResultMetadata {
            url: self.url,
            timestamp: self.started.to_rfc3339_opts(SecondsFormat::Millis, true),
            duration_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            engine_version: ENGINE_VERSION.to_string(),
            registry_version: REGISTRY_VERSION,
            platform: self.platform,
        }
    }
}

/// A successful result.
#[must_use]
pub fn success(data: ScrapedTitleData, logs: Vec<String>, stamp: RunStamp, elapsed: Duration) -> ScrapingResult {
    let confidence = confidence(&data);
    let extracted_fields = data
        .extracted_fields()
        .into_iter()
        .map(|name| name.as_str().to_string())
        .collect();

    ScrapingResult {
        success: true,
        data: Some(data),
        confidence,
        extracted_fields,
        logs,
        metadata: stamp.metadata(elapsed),
        error: None,
    }
}

/// A failed result: no data, zero confidence, no extracted fields.
#[must_use]
pub fn failure(
    kind: FailureKind,
    message: impl Into<String>,
    logs: Vec<String>,
    stamp: RunStamp,
    elapsed: Duration,
) -> ScrapingResult {
    ScrapingResult {
        success: false,
        data: None,
        confidence: 0.0,
        extracted_fields: Vec::new(),
        logs,
        metadata: stamp.metadata(elapsed),
        error: Some(ScrapeFailure {
            kind,
            message: message.into(),
        }),
    }
}
