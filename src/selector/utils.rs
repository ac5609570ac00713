//! Utility functions for selector rules
//!
//! Class/tag access with empty-string defaults, keyword matching, and the
//! label/value lookups that generic fallback rules are built from.

use crate::dom::{self, NodeRef, Selection};

// === Keyword Matching ===

/// Whether `haystack` contains any of `needles`.
///
/// # Example
///
/// ```rust
/// use rs_storyscrape::selector::utils;
///
/// assert!(utils::contains_any("series-cover-img", &["poster", "cover"]));
/// assert!(!utils::contains_any("site-header", &["poster", "cover"]));
/// ```
#[inline]
#[must_use]
pub fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

// === Element Attribute Helpers ===

/// Element class attribute (empty string if missing)
#[inline]
#[must_use]
pub fn class(sel: &Selection) -> String {
    dom::class_name(sel).unwrap_or_default()
}

/// Tag name (empty string if missing)
#[inline]
#[must_use]
pub fn tag(sel: &Selection) -> String {
    dom::tag_name(sel).unwrap_or_default()
}

/// Lowercased id and class joined by a space.
///
/// # Example
///
/// ```rust
/// use rs_storyscrape::selector::utils;
/// use rs_storyscrape::dom;
///
/// let doc = dom::parse(r#"<div id="Main" class="Detail-Info">text</div>"#);
/// let div = doc.select("div");
///
/// assert_eq!(utils::id_class(&div), "main detail-info");
/// ```
#[must_use]
pub fn id_class(sel: &Selection) -> String {
    sel.nodes()
        .first()
        .map(|node| dom::id_class(node).trim().to_string())
        .unwrap_or_default()
}

// === Element Type Checks ===

/// Check if element is one of the specified tags
#[inline]
#[must_use]
pub fn is_one_of_tags(sel: &Selection, tags: &[&str]) -> bool {
    let t = tag(sel);
    tags.contains(&t.as_str())
}

// === Labels ===

/// Whether `text` is `label` itself, optionally followed by a colon.
#[must_use]
pub fn is_label(text: &str, label: &str) -> bool {
    let text = text.trim().trim_end_matches([':', '：']).trim_end();
    text.eq_ignore_ascii_case(label)
}

/// Value for a label inside a single text run: "장르 : 판타지" → "판타지".
///
/// Returns `None` when the text does not start with the label or nothing
/// follows it.
#[must_use]
pub fn inline_label_value(text: &str, label: &str) -> Option<String> {
    let text = text.trim();
    let head = text.get(..label.len())?;
    if !head.eq_ignore_ascii_case(label) {
        return None;
    }

    let rest = &text[label.len()..];
    if !rest.starts_with(|c: char| c.is_whitespace() || matches!(c, ':' | '：' | '|')) {
        return None;
    }
    let rest = rest
        .trim_start()
        .trim_start_matches([':', '：', '|'])
        .trim();
    (!rest.is_empty()).then(|| dom::normalize_whitespace(rest))
}

/// Next element sibling of a node.
#[inline]
#[must_use]
pub fn next_element<'a>(node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    node.next_element_sibling()
}
