//! Authorship credits.
//!
//! Platforms credit writers and artists in very different shapes: separate
//! elements per role, a single "글/그림 SIU" line, or "글 홍길동 / 그림 김철수".
//! Everything is normalized into [`Credits`].

use super::text::all_hint_values;
use super::PageContext;
use crate::dom;
use crate::error::Result;
use crate::patterns::AUTHOR_ROLE;
use crate::result::AuthorRole;
use crate::selector::{self, fields};

/// Labels whose value is a credit, with the roles they imply. No roles
/// means the value is parsed as a credit line.
const CREDIT_LABELS: &[(&str, &[AuthorRole])] = &[
    ("글/그림", &[AuthorRole::Writer, AuthorRole::Illustrator]),
    ("작가", &[]),
    ("저자", &[AuthorRole::Writer]),
    ("글", &[AuthorRole::Writer]),
    ("그림", &[AuthorRole::Illustrator]),
    ("작화", &[AuthorRole::Illustrator]),
    ("원작", &[AuthorRole::Original]),
];

/// Names credited per role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credits {
    pub writer: Option<String>,
    pub illustrator: Option<String>,
    pub original: Option<String>,
}

impl Credits {
    /// Whether no role is credited.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writer.is_none() && self.illustrator.is_none() && self.original.is_none()
    }

    /// Credit `name` to `role` unless that role is already credited.
    pub fn credit(&mut self, role: AuthorRole, name: &str) {
        let Some(name) = clean_name(name) else {
            return;
        };
        let slot = match role {
            AuthorRole::Writer => &mut self.writer,
            AuthorRole::Illustrator => &mut self.illustrator,
            AuthorRole::Original => &mut self.original,
        };
        if slot.is_none() {
            *slot = Some(name);
        }
    }

    /// Fill roles still empty from `other`.
    pub fn merge(&mut self, other: Credits) {
        if self.writer.is_none() {
            self.writer = other.writer;
        }
        if self.illustrator.is_none() {
            self.illustrator = other.illustrator;
        }
        if self.original.is_none() {
            self.original = other.original;
        }
    }
}

/// Split a credit line into roles.
///
/// Role markers may be Korean ("글", "그림", "원작") or English ("Writer",
/// "Artist"). A line without any marker credits the writer.
///
/// ```
/// use rs_storyscrape::extractor::authors::parse_credit_line;
///
/// let credits = parse_credit_line("글 홍길동 / 그림 김철수");
/// assert_eq!(credits.writer.as_deref(), Some("홍길동"));
/// assert_eq!(credits.illustrator.as_deref(), Some("김철수"));
///
/// let credits = parse_credit_line("글/그림 SIU");
/// assert_eq!(credits.writer.as_deref(), Some("SIU"));
/// assert_eq!(credits.illustrator.as_deref(), Some("SIU"));
/// ```
#[must_use]
pub fn parse_credit_line(line: &str) -> Credits {
    let mut credits = Credits::default();
    let mut marked = false;

    for caps in AUTHOR_ROLE.captures_iter(line) {
        let (Some(role), Some(name)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        marked = true;
        for role in roles_for_marker(role.as_str()) {
            credits.credit(*role, name.as_str());
        }
    }

    if !marked {
        credits.credit(AuthorRole::Writer, line);
    }

    credits
}

fn roles_for_marker(marker: &str) -> &'static [AuthorRole] {
    let marker: String = marker.to_lowercase().chars().filter(|c| !c.is_whitespace()).collect();
    match marker.as_str() {
        "글/그림" | "글·그림" | "글&그림" => &[AuthorRole::Writer, AuthorRole::Illustrator],
        "글" | "각색" | "writer" | "story" => &[AuthorRole::Writer],
        "그림" | "작화" | "artist" | "illustrator" | "art" => &[AuthorRole::Illustrator],
        m if m.starts_with("원작") || m.starts_with("original") => &[AuthorRole::Original],
        _ => &[],
    }
}

fn clean_name(raw: &str) -> Option<String> {
    let name = dom::normalize_whitespace(raw);
    let name = name.trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '/' | '|' | '·' | ':'));
    (!name.is_empty()).then(|| name.to_string())
}

fn credits_from_text(text: &str, roles: &[AuthorRole]) -> Credits {
    if roles.is_empty() {
        return parse_credit_line(text);
    }
    let mut credits = Credits::default();
    for role in roles {
        credits.credit(*role, text);
    }
    credits
}

/// Authorship credits for the page.
///
/// Profile hints first (role-bound or free-form), then credit labels, then
/// author-like elements, then `<meta name="author">`.
pub fn credits(ctx: &PageContext<'_>) -> Result<Option<Credits>> {
    let mut credits = Credits::default();

    for author_hint in ctx.profile.hints.authors {
        let values = all_hint_values(ctx, std::slice::from_ref(&author_hint.hint))?;
        if let Some(role) = author_hint.role {
            if let Some(first) = values.first() {
                credits.merge(credits_from_text(first, &[role]));
            }
        } else {
            for value in &values {
                credits.merge(parse_credit_line(value));
            }
        }
    }

    if credits.is_empty() {
        for (label, roles) in CREDIT_LABELS {
            if let Some(value) = selector::label_values(ctx.doc, label).into_iter().next() {
                credits.merge(credits_from_text(&value, roles));
            }
        }
    }

    if credits.is_empty() {
        if let Some(text) = selector::first_rule_text(ctx.doc, fields::is_author_element) {
            credits.merge(parse_credit_line(&text));
        }
    }

    if credits.is_empty() {
        if let Some(author) = dom::meta_content(ctx.doc, "author") {
            credits.merge(parse_credit_line(&author));
        }
    }

    Ok((!credits.is_empty()).then_some(credits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform;
    use url::Url;

    fn credits_for(html: &str, url: &str) -> Option<Credits> {
        let doc = dom::parse(html);
        let url = Url::parse(url).expect("valid url");
        let ctx = PageContext::new(&doc, &url, platform::resolve(&url));
        credits(&ctx).expect("no extractor error")
    }

    #[test]
    fn test_unmarked_line_credits_writer() {
        let credits = parse_credit_line("SIU");
        assert_eq!(credits.writer.as_deref(), Some("SIU"));
        assert!(credits.illustrator.is_none());
    }

    #[test]
    fn test_original_author_marker() {
        let credits = parse_credit_line("원작 추공 / 그림 DUBU(REDICE STUDIO)");
        assert_eq!(credits.original.as_deref(), Some("추공"));
        assert_eq!(credits.illustrator.as_deref(), Some("DUBU(REDICE STUDIO)"));
        assert!(credits.writer.is_none());
    }

    #[test]
    fn test_first_credit_per_role_wins() {
        let mut credits = Credits::default();
        credits.credit(AuthorRole::Writer, "first");
        credits.credit(AuthorRole::Writer, "second");
        credits.credit(AuthorRole::Writer, "   ");
        assert_eq!(credits.writer.as_deref(), Some("first"));
    }

    #[test]
    fn test_role_bound_hints() {
        let html = r#"<html><body><div class="metadata_writer">
            <a class="author_detail_link">산경</a>
            <a class="illustrator_detail_link">아이디</a>
        </div></body></html>"#;

        let credits = credits_for(html, "https://ridibooks.com/books/1").expect("credits");
        assert_eq!(credits.writer.as_deref(), Some("산경"));
        assert_eq!(credits.illustrator.as_deref(), Some("아이디"));
        assert!(credits.original.is_none());
    }

    #[test]
    fn test_label_fallback_on_generic_page() {
        let html = r#"<html><body><ul>
            <li><span>글</span><span>싱숑</span></li>
            <li><span>그림</span><span>슬리피-C</span></li>
        </ul></body></html>"#;

        let credits = credits_for(html, "https://example.org/t/1").expect("credits");
        assert_eq!(credits.writer.as_deref(), Some("싱숑"));
        assert_eq!(credits.illustrator.as_deref(), Some("슬리피-C"));
    }

    #[test]
    fn test_no_credits_is_absent() {
        assert_eq!(credits_for("<html><body><p>없음</p></body></html>", "https://example.org/"), None);
    }
}
