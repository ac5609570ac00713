//! Result types for scrape output.
//!
//! This module defines the normalized title record, the per-run result
//! wrapper returned to callers (and persisted as snapshots), and the log
//! trail threaded through a single run.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Publication format of a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Vertical-scroll comic.
    Webtoon,
    /// Serialized web novel.
    #[serde(rename = "webnovel")]
    WebNovel,
    /// Page-based comic / manga volume.
    Comic,
    /// E-book.
    Ebook,
}

impl Format {
    /// Lowercase wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Webtoon => "webtoon",
            Self::WebNovel => "webnovel",
            Self::Comic => "comic",
            Self::Ebook => "ebook",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authorship role attached to a credited name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorRole {
    /// Story / text.
    Writer,
    /// Art.
    Illustrator,
    /// Author of the original work an adaptation is based on.
    Original,
}

/// Name of a field of [`ScrapedTitleData`], as it appears in JSON and in
/// `extractedFields`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldName {
    TitleNameKr,
    TitleNameEn,
    Author,
    Illustrator,
    OriginalAuthor,
    Genre,
    Format,
    ChapterCount,
    IsCompleted,
    TitleImage,
    Views,
    Tags,
    AgeRating,
    ContentProvider,
    Description,
}

impl FieldName {
    /// JSON key of the field.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TitleNameKr => "title_name_kr",
            Self::TitleNameEn => "title_name_en",
            Self::Author => "author",
            Self::Illustrator => "illustrator",
            Self::OriginalAuthor => "original_author",
            Self::Genre => "genre",
            Self::Format => "format",
            Self::ChapterCount => "chapter_count",
            Self::IsCompleted => "is_completed",
            Self::TitleImage => "title_image",
            Self::Views => "views",
            Self::Tags => "tags",
            Self::AgeRating => "age_rating",
            Self::ContentProvider => "content_provider",
            Self::Description => "description",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One extractor's outcome: a named value, or absent.
///
/// Absent is `None`, never an empty string: confidence scoring counts
/// presence, so "found but empty" must not exist.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedField<T> {
    /// Which field this is.
    pub name: FieldName,
    /// The value, if the extractor found one.
    pub value: Option<T>,
}

impl<T> ExtractedField<T> {
    /// A field that was found.
    pub fn found(name: FieldName, value: T) -> Self {
        Self {
            name,
            value: Some(value),
        }
    }

    /// A field that could not be determined.
    #[must_use]
    pub fn absent(name: FieldName) -> Self {
        Self { name, value: None }
    }

    /// Whether a value was extracted.
    pub fn extracted(&self) -> bool {
        self.value.is_some()
    }
}

/// Normalized metadata for one title.
///
/// `title_name_kr` is the only required field. Every other field is
/// `None` when it could not be determined and is then omitted from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapedTitleData {
    /// Title in the platform's native language.
    pub title_name_kr: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_name_en: Option<String>,

    /// Writer credit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Artist credit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub illustrator: Option<String>,

    /// Original-work credit for adaptations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_count: Option<u32>,

    /// `true` when the title is finished, `false` when still serializing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,

    /// Resolved absolute URL of the cover image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,

    /// Never `Some` with an empty list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Minimum audience age ("all", "12", "15", "19").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_rating: Option<String>,

    /// Publisher / content provider credit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_provider: Option<String>,

    /// Synopsis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ScrapedTitleData {
    /// Names of every populated field, in declaration order.
    ///
    /// This is the single source for `ScrapingResult::extracted_fields`.
    #[must_use]
    pub fn extracted_fields(&self) -> Vec<FieldName> {
        let present = [
            (FieldName::TitleNameKr, !self.title_name_kr.is_empty()),
            (FieldName::TitleNameEn, self.title_name_en.is_some()),
            (FieldName::Author, self.author.is_some()),
            (FieldName::Illustrator, self.illustrator.is_some()),
            (FieldName::OriginalAuthor, self.original_author.is_some()),
            (FieldName::Genre, self.genre.is_some()),
            (FieldName::Format, self.format.is_some()),
            (FieldName::ChapterCount, self.chapter_count.is_some()),
            (FieldName::IsCompleted, self.is_completed.is_some()),
            (FieldName::TitleImage, self.title_image.is_some()),
            (FieldName::Views, self.views.is_some()),
            (FieldName::Tags, self.tags.as_ref().is_some_and(|t| !t.is_empty())),
            (FieldName::AgeRating, self.age_rating.is_some()),
            (FieldName::ContentProvider, self.content_provider.is_some()),
            (FieldName::Description, self.description.is_some()),
        ];
        present
            .into_iter()
            .filter_map(|(name, found)| found.then_some(name))
            .collect()
    }

    /// Whether any authorship role was credited.
    #[must_use]
    pub fn has_authorship(&self) -> bool {
        self.author.is_some() || self.illustrator.is_some() || self.original_author.is_some()
    }
}

/// Why a run produced no title data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The requested URL was not a usable http(s) URL.
    InvalidUrl,
    /// The page could not be loaded.
    Render,
    /// The page did not load within the render timeout.
    RenderTimeout,
    /// The page loaded but no title could be found.
    MissingTitle,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InvalidUrl => "invalid_url",
            Self::Render => "render",
            Self::RenderTimeout => "render_timeout",
            Self::MissingTitle => "missing_title",
        };
        f.write_str(s)
    }
}

/// Structured failure attached to a `success: false` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeFailure {
    pub kind: FailureKind,
    pub message: String,
}

/// Provenance of a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMetadata {
    /// URL as requested by the caller.
    pub url: String,
    /// RFC 3339 time the run started.
    pub timestamp: String,
    /// Wall-clock duration of the run.
    pub duration_ms: u64,
    /// `<crate>/<version>` that produced the result.
    pub engine_version: String,
    /// Version of the platform profile registry used.
    #[serde(default)]
    pub registry_version: u32,
    /// Platform profile key used for extraction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

/// Output of one scrape run. Immutable once assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapingResult {
    pub success: bool,
    pub data: Option<ScrapedTitleData>,
    /// Fraction of the expected-field checklist that was populated, 0.0–1.0.
    pub confidence: f64,
    /// JSON names of the populated fields of `data`.
    pub extracted_fields: Vec<String>,
    /// Ordered trail of what happened during the run.
    pub logs: Vec<String>,
    pub metadata: ResultMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ScrapeFailure>,
}

/// Append-only log trail owned by a single run.
#[derive(Debug, Default, Clone)]
pub struct ScrapeLog {
    lines: Vec<String>,
}

impl ScrapeLog {
    /// An empty trail.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line. Mirrored to `tracing` at debug level.
    pub fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        tracing::debug!(target: "rs_storyscrape::run", "{line}");
        self.lines.push(line);
    }

    /// Lines recorded so far.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Consume the trail.
    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracted_fields_lists_only_present_values() {
        let data = ScrapedTitleData {
            title_name_kr: "신의 탑".to_string(),
            views: Some(137_000),
            tags: Some(Vec::new()),
            ..ScrapedTitleData::default()
        };

        assert_eq!(
            data.extracted_fields(),
            vec![FieldName::TitleNameKr, FieldName::Views]
        );
    }

    #[test]
    fn absent_fields_are_omitted_from_json() {
        let data = ScrapedTitleData {
            title_name_kr: "나 혼자만 레벨업".to_string(),
            format: Some(Format::WebNovel),
            ..ScrapedTitleData::default()
        };

        let json = serde_json::to_value(&data).expect("serializes");
        assert_eq!(json["title_name_kr"], "나 혼자만 레벨업");
        assert_eq!(json["format"], "webnovel");
        assert!(json.get("author").is_none());
        assert!(json.get("views").is_none());
    }

    #[test]
    fn result_uses_camel_case_envelope() {
        let result = ScrapingResult {
            success: false,
            data: None,
            confidence: 0.0,
            extracted_fields: Vec::new(),
            logs: vec!["render failed".to_string()],
            metadata: ResultMetadata {
                url: "https://example.com".to_string(),
                timestamp: "2026-01-01T00:00:00Z".to_string(),
                duration_ms: 5,
                engine_version: "rs-storyscrape/0.1.0".to_string(),
                registry_version: 4,
                platform: None,
            },
            error: Some(ScrapeFailure {
                kind: FailureKind::RenderTimeout,
                message: "timed out".to_string(),
            }),
        };

        let json = serde_json::to_value(&result).expect("serializes");
        assert!(json.get("extractedFields").is_some());
        assert_eq!(json["metadata"]["durationMs"], 5);
        assert_eq!(json["metadata"]["engineVersion"], "rs-storyscrape/0.1.0");
        assert_eq!(json["metadata"]["registryVersion"], 4);
        assert_eq!(json["error"]["kind"], "render_timeout");

        let back: ScrapingResult = serde_json::from_value(json).expect("deserializes");
        assert_eq!(back, result);
    }

    #[test]
    fn extracted_field_tracks_presence() {
        let found = ExtractedField::found(FieldName::Views, 5_u64);
        let absent: ExtractedField<u64> = ExtractedField::absent(FieldName::Views);
        assert!(found.extracted());
        assert!(!absent.extracted());
    }
}
