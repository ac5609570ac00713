//! Text field extractors: title, English title, genre, format, tags,
//! content provider and synopsis.

use super::PageContext;
use crate::dom;
use crate::error::Result;
use crate::patterns::{GENRE_LABELS, PLATFORM_TITLE_SUFFIXES, PROVIDER_LABELS, TITLE_SEPARATOR};
use crate::platform::Hint;
use crate::result::Format;
use crate::selector::{self, fields, Rule};

/// Format words that trail a title in `<title>`/`og:title` ("신의 탑 - 웹툰").
const FORMAT_SUFFIXES: &[&str] = &["웹툰", "웹소설", "만화", "소설", "ebook", "e북", "시리즈"];

/// Longest plausible genre label.
const GENRE_MAX_CHARS: usize = 30;

/// First value any of `hints` yields.
pub(crate) fn first_hint_value(ctx: &PageContext<'_>, hints: &[Hint]) -> Result<Option<String>> {
    for hint in hints {
        if let Some(value) = selector::hint_value(ctx.doc, hint)? {
            return Ok(Some(value));
        }
    }
    Ok(None)
}

/// Every value all of `hints` yield, in hint order.
pub(crate) fn all_hint_values(ctx: &PageContext<'_>, hints: &[Hint]) -> Result<Vec<String>> {
    let mut values = Vec::new();
    for hint in hints {
        values.extend(selector::hint_values(ctx.doc, hint)?);
    }
    Ok(values)
}

/// First value following any of `labels`.
pub(crate) fn first_label_value(ctx: &PageContext<'_>, labels: &[&str]) -> Option<String> {
    labels
        .iter()
        .find_map(|label| selector::label_values(ctx.doc, label).into_iter().next())
}

fn first_rule_value(ctx: &PageContext<'_>, rule: Rule) -> Option<String> {
    selector::first_rule_text(ctx.doc, rule)
}

// === Title ===

/// Native-language title.
///
/// Profile hints, then `og:title`, then title-like headings, then the
/// document `<title>`. Platform suffixes are stripped from every candidate.
pub fn title(ctx: &PageContext<'_>) -> Result<Option<String>> {
    if let Some(found) = first_hint_value(ctx, ctx.profile.hints.title)? {
        if let Some(clean) = clean_title(&found) {
            return Ok(Some(clean));
        }
    }

    let candidates = [
        dom::meta_content(ctx.doc, "og:title"),
        first_rule_value(ctx, fields::is_title_heading),
        first_rule_value(ctx, fields::is_main_heading),
        document_title(ctx),
    ];

    Ok(candidates.into_iter().flatten().find_map(|c| clean_title(&c)))
}

/// Latin-script title, when the page carries one distinct from `native`.
pub fn title_en(ctx: &PageContext<'_>, native: &str) -> Result<Option<String>> {
    let hinted = first_hint_value(ctx, ctx.profile.hints.title_en)?;

    let candidates = [
        hinted,
        dom::meta_content(ctx.doc, "og:title:en"),
        dom::meta_content(ctx.doc, "og:title"),
        document_title(ctx),
    ];

    Ok(candidates
        .into_iter()
        .flatten()
        .filter_map(|c| clean_title(&c))
        .find(|c| is_latin_title(c) && !c.eq_ignore_ascii_case(native.trim())))
}

fn document_title(ctx: &PageContext<'_>) -> Option<String> {
    dom::first_text(ctx.doc, "title").ok().flatten()
}

/// Normalize whitespace and drop trailing platform / format suffixes.
///
/// ```
/// use rs_storyscrape::extractor::text::clean_title;
///
/// assert_eq!(clean_title("신의 탑 - 웹툰 | 카카오페이지"), Some("신의 탑".to_string()));
/// assert_eq!(clean_title("  나 혼자만 레벨업  "), Some("나 혼자만 레벨업".to_string()));
/// assert_eq!(clean_title(" | 네이버 웹툰"), None);
/// assert_eq!(clean_title("Webtoon Hero"), Some("Webtoon Hero".to_string()));
/// ```
#[must_use]
pub fn clean_title(raw: &str) -> Option<String> {
    let text = dom::normalize_whitespace(raw);
    let mut parts: Vec<&str> = TITLE_SEPARATOR
        .split(&text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    while parts.len() > 1 && parts.last().is_some_and(|p| is_title_suffix(p)) {
        parts.pop();
    }

    match parts.as_slice() {
        [] => None,
        [only] if is_bare_suffix(only) => None,
        _ => Some(parts.join(" - ")),
    }
}

fn is_title_suffix(part: &str) -> bool {
    let lower = part.to_lowercase();
    PLATFORM_TITLE_SUFFIXES.iter().any(|s| lower.contains(s)) || FORMAT_SUFFIXES.contains(&lower.as_str())
}

fn is_bare_suffix(part: &str) -> bool {
    let lower = part.to_lowercase();
    PLATFORM_TITLE_SUFFIXES.contains(&lower.as_str()) || FORMAT_SUFFIXES.contains(&lower.as_str())
}

fn is_latin_title(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_alphabetic())
        && text
            .chars()
            .all(|c| c.is_ascii() || c.is_whitespace() || matches!(c, '’' | '‘' | '…' | '–'))
}

// === Genre ===

/// Genre label.
pub fn genre(ctx: &PageContext<'_>) -> Result<Option<String>> {
    let found = match first_hint_value(ctx, ctx.profile.hints.genre)? {
        Some(value) => Some(value),
        None => first_label_value(ctx, GENRE_LABELS).or_else(|| first_rule_value(ctx, fields::is_genre_element)),
    };

    Ok(found.and_then(|value| clean_genre(&value)))
}

fn clean_genre(raw: &str) -> Option<String> {
    let text = raw.trim().trim_start_matches('#').trim();
    let text = text
        .strip_prefix("장르")
        .map_or(text, |rest| rest.trim_start_matches([':', '：']).trim());
    (!text.is_empty() && text.chars().count() <= GENRE_MAX_CHARS).then(|| text.to_string())
}

// === Format ===

/// Publication format.
///
/// A profile's fixed format wins, then a URL-path mapping, then words in
/// the page's title and keywords.
pub fn format(ctx: &PageContext<'_>) -> Result<Option<Format>> {
    if let Some(format) = ctx.profile.default_format {
        return Ok(Some(format));
    }

    let path = ctx.url.path();
    if let Some((_, format)) = ctx
        .profile
        .format_by_path
        .iter()
        .find(|(fragment, _)| path.contains(fragment))
    {
        return Ok(Some(*format));
    }

    let haystack = [
        document_title(ctx),
        dom::meta_content(ctx.doc, "og:title"),
        dom::meta_content(ctx.doc, "keywords"),
        dom::meta_content(ctx.doc, "og:type"),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ");

    Ok(format_from_text(&haystack))
}

/// Format named in free text, if any.
///
/// ```
/// use rs_storyscrape::extractor::text::format_from_text;
/// use rs_storyscrape::Format;
///
/// assert_eq!(format_from_text("나 혼자만 레벨업 - 웹소설"), Some(Format::WebNovel));
/// assert_eq!(format_from_text("about us"), None);
/// ```
#[must_use]
pub fn format_from_text(text: &str) -> Option<Format> {
    let lower = text.to_lowercase();
    let table: [(&[&str], Format); 4] = [
        (&["웹툰", "webtoon"], Format::Webtoon),
        (&["웹소설", "web novel", "webnovel", "novel", "소설"], Format::WebNovel),
        (&["만화", "comic", "manga"], Format::Comic),
        (&["ebook", "e북", "전자책"], Format::Ebook),
    ];

    table
        .iter()
        .find(|(words, _)| words.iter().any(|w| lower.contains(w)))
        .map(|(_, format)| *format)
}

// === Tags ===

/// Keyword tags, `#` stripped, de-duplicated in first-seen order.
pub fn tags(ctx: &PageContext<'_>) -> Result<Option<Vec<String>>> {
    let mut raw = all_hint_values(ctx, ctx.profile.hints.tags)?;
    if raw.is_empty() {
        raw = selector::rule_texts(ctx.doc, fields::is_tag_element);
    }

    let mut tags: Vec<String> = Vec::new();
    for tag in raw.iter().flat_map(|value| split_tags(value)) {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    Ok((!tags.is_empty()).then_some(tags))
}

fn split_tags(value: &str) -> Vec<String> {
    value
        .split('#')
        .map(dom::normalize_whitespace)
        .filter(|tag| !tag.is_empty())
        .collect()
}

// === Provider / Description ===

/// Publisher or content provider credit.
pub fn content_provider(ctx: &PageContext<'_>) -> Result<Option<String>> {
    if let Some(value) = first_hint_value(ctx, ctx.profile.hints.provider)? {
        return Ok(Some(value));
    }
    Ok(first_label_value(ctx, PROVIDER_LABELS).or_else(|| first_rule_value(ctx, fields::is_provider_element)))
}

/// Synopsis.
pub fn description(ctx: &PageContext<'_>) -> Result<Option<String>> {
    if let Some(value) = first_hint_value(ctx, ctx.profile.hints.description)? {
        return Ok(Some(value));
    }

    Ok(dom::meta_content(ctx.doc, "og:description")
        .or_else(|| dom::meta_content(ctx.doc, "description"))
        .map(|d| dom::normalize_whitespace(&d))
        .filter(|d| !d.is_empty())
        .or_else(|| first_rule_value(ctx, fields::is_description_element)))
}
