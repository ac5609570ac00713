//! Numeric extractors: chapter count and view count.

use super::text::all_hint_values;
use super::PageContext;
use crate::dom;
use crate::error::Result;
use crate::magnitude;
use crate::patterns::{CHAPTER_COUNT, NUMERAL_TOKEN, VIEW_LABEL};
use crate::selector::{self, fields};

/// Labels whose value is a view count.
const VIEW_LABELS: &[&str] = &["조회수", "조회", "누적 조회", "열람", "views", "view"];

/// Units that follow a chapter or volume count.
const CHAPTER_UNITS: &[char] = &['화', '회', '권', '話'];

/// Markers that make a chapter-count match a total rather than one
/// episode's number.
const TOTAL_MARKERS: &[&str] = &["총", "全", "전체", "완결", "episodes", "chapters"];

/// Total number of chapters / episodes.
///
/// Explicit totals from profile hints or page text first; otherwise the
/// number of episode-list entries.
pub fn chapter_count(ctx: &PageContext<'_>) -> Result<Option<u32>> {
    let hinted = all_hint_values(ctx, ctx.profile.hints.chapter_count)?;
    if let Some(count) = hinted.iter().find_map(|value| parse_chapter_count(value, false)) {
        return Ok(Some(count));
    }

    let text_total = ctx
        .doc
        .select("span, em, strong, p, li, dd, h4, h5, div")
        .nodes()
        .iter()
        .filter(|node| node.element_children().is_empty())
        .filter_map(|node| dom::normalized_text(&dom::Selection::from(*node)))
        .find_map(|text| parse_chapter_count(&text, true));
    if text_total.is_some() {
        return Ok(text_total);
    }

    let items = match ctx.profile.hints.episode_item {
        Some(selector) => dom::select_all(ctx.doc, selector)?.length(),
        None => 0,
    };
    let items = if items == 0 {
        selector::query_all(&ctx.doc.select("body"), fields::is_episode_item).len()
    } else {
        items
    };

    Ok(u32::try_from(items).ok().filter(|n| *n > 0))
}

/// Chapter count in `text`. With `require_total`, only matches marked as a
/// total ("총 120화", "120화 완결") are accepted.
fn parse_chapter_count(text: &str, require_total: bool) -> Option<u32> {
    if require_total && !TOTAL_MARKERS.iter().any(|m| text.contains(m)) {
        return None;
    }

    if let Some(caps) = CHAPTER_COUNT.captures(text) {
        return caps.get(1).and_then(|m| m.as_str().parse().ok()).filter(|n| *n > 0);
    }

    if require_total {
        return None;
    }

    // A bare hinted value must be a plain integer; "13.7만" is a view count.
    text.trim()
        .replace(',', "")
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
}

/// Total view count.
///
/// The located numeral ("13.7만", "1.2억", "1,204") is scaled by the
/// magnitude parser.
pub fn views(ctx: &PageContext<'_>) -> Result<Option<u64>> {
    let hinted = all_hint_values(ctx, ctx.profile.hints.views)?;
    if let Some(views) = hinted.iter().find_map(|value| parse_views(value)) {
        return Ok(Some(views));
    }

    let labelled = VIEW_LABELS
        .iter()
        .flat_map(|label| selector::label_values(ctx.doc, label))
        .find_map(|value| parse_views(&value));
    if labelled.is_some() {
        return Ok(labelled);
    }

    Ok(selector::rule_texts(ctx.doc, fields::is_view_element)
        .iter()
        .find_map(|value| parse_views(value)))
}

/// View count in a text fragment.
///
/// ```
/// use rs_storyscrape::extractor::counts::parse_views;
///
/// assert_eq!(parse_views("13.7만"), Some(137_000));
/// assert_eq!(parse_views("조회 1.2억"), Some(120_000_000));
/// assert_eq!(parse_views("관심 없음"), None);
/// ```
#[must_use]
pub fn parse_views(text: &str) -> Option<u64> {
    let text = text.trim();

    if let Some(n) = magnitude::parse(text) {
        return Some(n);
    }

    if let Some(n) = VIEW_LABEL
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| magnitude::parse(m.as_str()))
    {
        return Some(n);
    }

    NUMERAL_TOKEN
        .find_iter(text)
        .filter(|m| !starts_with_chapter_unit(&text[m.end()..]))
        .find_map(|m| magnitude::parse(m.as_str()))
}

/// "200화", "12회", "3권": a numeral counting chapters, not views.
fn starts_with_chapter_unit(rest: &str) -> bool {
    rest.trim_start()
        .chars()
        .next()
        .is_some_and(|c| CHAPTER_UNITS.contains(&c))
}
