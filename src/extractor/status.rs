//! Completion status and audience rating.
//!
//! Both map a small vocabulary of visible tokens to a value. Text outside the
//! vocabulary yields absent rather than a guess.

use super::text::all_hint_values;
use super::PageContext;
use crate::error::Result;
use crate::patterns::AGE_RATING;
use crate::selector::{self, fields};

/// Tokens meaning the title is finished.
const COMPLETED_TOKENS: &[&str] = &["완결", "완결작", "완료", "completed", "complete", "finished", "end"];

/// Tokens meaning the title is still running (including hiatus).
const ONGOING_TOKENS: &[&str] = &[
    "연재중", "연재", "휴재", "휴재중", "미완결", "ongoing", "serializing", "hiatus",
];

/// Labels whose value is an audience rating.
const RATING_LABELS: &[&str] = &["이용가", "연령", "등급", "rating"];

/// Classify a status text.
///
/// Any completed token wins over ongoing tokens ("연재 완결" is finished).
///
/// ```
/// use rs_storyscrape::extractor::status::classify_status;
///
/// assert_eq!(classify_status("완결"), Some(true));
/// assert_eq!(classify_status("매주 월요일 연재"), Some(false));
/// assert_eq!(classify_status("무료"), None);
/// ```
#[must_use]
pub fn classify_status(text: &str) -> Option<bool> {
    let lower = text.to_lowercase();
    let tokens: Vec<&str> = lower
        .split(|c: char| c.is_whitespace() || matches!(c, '·' | '|' | '/' | ',' | '(' | ')' | '[' | ']' | '•'))
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.iter().any(|t| COMPLETED_TOKENS.contains(t)) {
        Some(true)
    } else if tokens.iter().any(|t| ONGOING_TOKENS.contains(t)) {
        Some(false)
    } else {
        None
    }
}

/// Whether the title is completed.
pub fn is_completed(ctx: &PageContext<'_>) -> Result<Option<bool>> {
    let hinted = all_hint_values(ctx, ctx.profile.hints.status)?;
    if let Some(status) = hinted.iter().find_map(|value| classify_status(value)) {
        return Ok(Some(status));
    }

    Ok(selector::rule_texts(ctx.doc, fields::is_status_element)
        .iter()
        .find_map(|value| classify_status(value)))
}

/// Normalize a rating text to "all", "12", "15" or "19".
///
/// ```
/// use rs_storyscrape::extractor::status::classify_rating;
///
/// assert_eq!(classify_rating("전체연령가"), Some("all".to_string()));
/// assert_eq!(classify_rating("15세 이용가"), Some("15".to_string()));
/// assert_eq!(classify_rating("성인"), Some("19".to_string()));
/// assert_eq!(classify_rating("7세"), None);
/// ```
#[must_use]
pub fn classify_rating(text: &str) -> Option<String> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_lowercase();

    if compact.contains("전체연령") || compact.contains("전체이용") || compact.contains("allages") {
        return Some("all".to_string());
    }

    if let Some(age) = AGE_RATING
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u8>().ok())
    {
        return match age {
            12 | 15 => Some(age.to_string()),
            18 | 19 => Some("19".to_string()),
            _ => None,
        };
    }

    if compact.contains("성인") || compact.contains("청소년이용불가") || compact == "adult" {
        return Some("19".to_string());
    }

    None
}

/// Audience rating.
pub fn age_rating(ctx: &PageContext<'_>) -> Result<Option<String>> {
    let hinted = all_hint_values(ctx, ctx.profile.hints.age_rating)?;
    if let Some(rating) = hinted.iter().find_map(|value| classify_rating(value)) {
        return Ok(Some(rating));
    }

    let labelled = RATING_LABELS
        .iter()
        .flat_map(|label| selector::label_values(ctx.doc, label))
        .find_map(|value| classify_rating(&value));
    if labelled.is_some() {
        return Ok(labelled);
    }

    Ok(selector::rule_texts(ctx.doc, fields::is_age_element)
        .iter()
        .find_map(|value| classify_rating(value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;
    use crate::platform;
    use url::Url;

    #[test]
    fn test_status_vocabulary() {
        for token in ["완결", "완료", "Completed", "END"] {
            assert_eq!(classify_status(token), Some(true), "{token}");
        }
        for token in ["연재중", "휴재", "Ongoing", "미완결"] {
            assert_eq!(classify_status(token), Some(false), "{token}");
        }
    }

    #[test]
    fn test_status_requires_whole_tokens() {
        assert_eq!(classify_status("weekend special"), None);
        assert_eq!(classify_status("완결까지 무료"), None);
        assert_eq!(classify_status(""), None);
    }

    #[test]
    fn test_completed_wins_over_ongoing() {
        assert_eq!(classify_status("연재 · 완결"), Some(true));
    }

    #[test]
    fn test_rating_from_age_marker() {
        assert_eq!(classify_rating("12세 이용가"), Some("12".to_string()));
        assert_eq!(classify_rating("18+"), Some("19".to_string()));
        assert_eq!(classify_rating("전체 이용가"), Some("all".to_string()));
        assert_eq!(classify_rating("무료"), None);
    }

    #[test]
    fn test_is_completed_from_profile_hint() {
        let html = r#"<html><body><div class="detail-box"><span class="xui-finish">완결</span></div></body></html>"#;
        let doc = dom::parse(html);
        let url = Url::parse("https://novel.munpia.com/1").expect("valid url");
        let ctx = PageContext::new(&doc, &url, platform::resolve(&url));

        assert_eq!(is_completed(&ctx).expect("ok"), Some(true));
    }

    #[test]
    fn test_age_rating_from_badge_class() {
        let html = r#"<html><body><div class="info"><span class="age-badge">15세 이용가</span></div></body></html>"#;
        let doc = dom::parse(html);
        let url = Url::parse("https://example.org/1").expect("valid url");
        let ctx = PageContext::new(&doc, &url, &platform::GENERIC);

        assert_eq!(age_rating(&ctx).expect("ok"), Some("15".to_string()));
    }
}
