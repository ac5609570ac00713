//! Field extraction.
//!
//! Every extractor is a function of a [`PageContext`] returning
//! `Result<Option<T>>`: `Ok(None)` when the field is not on the page, `Err`
//! when the extractor itself failed (a broken selector hint, say). Both are
//! recorded as an absent field by [`record`]; neither aborts the run.
//!
//! # Module Structure
//!
//! - `text`: title, English title, genre, format, tags, provider, synopsis
//! - `authors`: role-split authorship credits
//! - `counts`: chapter count and view count
//! - `status`: completion flag and audience rating

pub mod authors;
pub mod counts;
pub mod status;
pub mod text;

use url::Url;

use crate::dom::Document;
use crate::error::{Error, Result};
use crate::platform::PlatformProfile;
use crate::result::{ExtractedField, FieldName, Format, ScrapeLog};

pub use authors::Credits;

/// Everything an extractor may read: the parsed page, the URL it was loaded
/// from, and the resolved platform profile.
#[derive(Clone, Copy)]
pub struct PageContext<'a> {
    pub doc: &'a Document,
    pub url: &'a Url,
    pub profile: &'static PlatformProfile,
}

impl<'a> PageContext<'a> {
    #[must_use]
    pub fn new(doc: &'a Document, url: &'a Url, profile: &'static PlatformProfile) -> Self {
        Self { doc, url, profile }
    }
}

/// Outcome of every text-field extractor for one page.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub title: ExtractedField<String>,
    pub title_en: ExtractedField<String>,
    pub author: ExtractedField<String>,
    pub illustrator: ExtractedField<String>,
    pub original_author: ExtractedField<String>,
    pub genre: ExtractedField<String>,
    pub format: ExtractedField<Format>,
    pub chapter_count: ExtractedField<u32>,
    pub is_completed: ExtractedField<bool>,
    pub views: ExtractedField<u64>,
    pub tags: ExtractedField<Vec<String>>,
    pub age_rating: ExtractedField<String>,
    pub content_provider: ExtractedField<String>,
    pub description: ExtractedField<String>,
}

/// Turn an extractor outcome into a field, logging what happened.
pub fn record<T>(name: FieldName, outcome: Result<Option<T>>, log: &mut ScrapeLog) -> ExtractedField<T> {
    match outcome {
        Ok(Some(value)) => {
            log.push(format!("{name}: found"));
            ExtractedField::found(name, value)
        }
        Ok(None) => {
            log.push(format!("{name}: not found"));
            ExtractedField::absent(name)
        }
        Err(err) => {
            tracing::warn!(field = %name, error = %err, "extractor failed");
            log.push(format!("{name}: extractor failed: {err}"));
            ExtractedField::absent(name)
        }
    }
}

/// Run every field extractor against one page.
///
/// Extractor failures are contained here; the returned fields are absent
/// for anything that failed or was not found.
pub fn extract_all(ctx: &PageContext<'_>, log: &mut ScrapeLog) -> Extraction {
    let title = record(FieldName::TitleNameKr, text::title(ctx), log);
    let native = title.value.clone().unwrap_or_default();
    let title_en = record(FieldName::TitleNameEn, text::title_en(ctx, &native), log);

    let (author, illustrator, original_author) = match authors::credits(ctx) {
        Ok(Some(credits)) => (
            record(FieldName::Author, Ok(credits.writer), log),
            record(FieldName::Illustrator, Ok(credits.illustrator), log),
            record(FieldName::OriginalAuthor, Ok(credits.original), log),
        ),
        Ok(None) => (
            record(FieldName::Author, Ok(None), log),
            record(FieldName::Illustrator, Ok(None), log),
            record(FieldName::OriginalAuthor, Ok(None), log),
        ),
        Err(err) => {
            let reason = err.to_string();
            (
                record(FieldName::Author, Err(err), log),
                record(FieldName::Illustrator, Err(extraction_error("authors", &reason)), log),
                record(FieldName::OriginalAuthor, Err(extraction_error("authors", &reason)), log),
            )
        }
    };

    Extraction {
        title,
        title_en,
        author,
        illustrator,
        original_author,
        genre: record(FieldName::Genre, text::genre(ctx), log),
        format: record(FieldName::Format, text::format(ctx), log),
        chapter_count: record(FieldName::ChapterCount, counts::chapter_count(ctx), log),
        is_completed: record(FieldName::IsCompleted, status::is_completed(ctx), log),
        views: record(FieldName::Views, counts::views(ctx), log),
        tags: record(FieldName::Tags, text::tags(ctx), log),
        age_rating: record(FieldName::AgeRating, status::age_rating(ctx), log),
        content_provider: record(FieldName::ContentProvider, text::content_provider(ctx), log),
        description: record(FieldName::Description, text::description(ctx), log),
    }
}

fn extraction_error(field: &'static str, reason: &str) -> Error {
    Error::Extraction {
        field,
        reason: reason.to_string(),
    }
}
