//! DOM Operations Adapter
//!
//! Thin helpers over the `dom_query` crate used by the extractors and the
//! cover image selector. Every helper tolerates empty selections and returns
//! `None`/empty values rather than panicking.

pub use dom_query::{Document, Matcher, NodeRef, Selection};
pub use tendril::StrTendril;

use crate::error::{Error, Result};
use crate::patterns::WHITESPACE_NORMALIZE;

// === Attribute Operations ===

/// Get element class attribute
#[inline]
#[must_use]
pub fn class_name(sel: &Selection) -> Option<String> {
    sel.attr("class").map(|s| s.to_string())
}

/// Get any attribute value, trimmed, treating blank values as missing.
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Get an attribute from a raw node, treating blank values as missing.
#[must_use]
pub fn node_attribute(node: &NodeRef, name: &str) -> Option<String> {
    node.attr(name)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Get tag name (lowercase)
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(NodeRef::node_name)
        .map(|t| t.to_string())
}

// === Text Content ===

/// Get all text content of node and descendants
#[inline]
#[must_use]
pub fn text_content(sel: &Selection) -> StrTendril {
    sel.text()
}

/// Text content with whitespace runs collapsed and the ends trimmed.
///
/// Returns `None` when the element has no visible text.
#[must_use]
pub fn normalized_text(sel: &Selection) -> Option<String> {
    let raw = text_content(sel);
    let text = WHITESPACE_NORMALIZE.replace_all(raw.trim(), " ").to_string();
    (!text.is_empty()).then_some(text)
}

/// Collapse whitespace in an arbitrary string.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_NORMALIZE.replace_all(text.trim(), " ").to_string()
}

// === Querying ===

/// Compile a CSS selector, surfacing parse failures as errors instead of
/// panicking like `Selection::select` does.
pub fn compile(selector: &str) -> Result<Matcher> {
    Matcher::new(selector).map_err(|_| Error::InvalidSelector(selector.to_string()))
}

/// All elements matching `selector`, in document order.
pub fn select_all<'a>(doc: &'a Document, selector: &str) -> Result<Selection<'a>> {
    let matcher = compile(selector)?;
    Ok(doc.select_matcher(&matcher))
}

/// Text of the first element matching `selector` that has visible text.
pub fn first_text(doc: &Document, selector: &str) -> Result<Option<String>> {
    let matches = select_all(doc, selector)?;
    Ok(matches
        .nodes()
        .iter()
        .find_map(|node| normalized_text(&Selection::from(*node))))
}

/// Content of `<meta property=…>` or `<meta name=…>` with the given key.
#[must_use]
pub fn meta_content(doc: &Document, key: &str) -> Option<String> {
    doc.select("meta").nodes().iter().find_map(|node| {
        let matches_key = ["property", "name", "itemprop"]
            .iter()
            .filter_map(|attr| node.attr(attr))
            .any(|value| value.trim().eq_ignore_ascii_case(key));
        if matches_key {
            node_attribute(node, "content")
        } else {
            None
        }
    })
}

// === Tree Navigation ===

/// Element ancestors of a node, nearest first, up to `max_depth` levels.
#[must_use]
pub fn element_ancestors<'a>(node: &NodeRef<'a>, max_depth: usize) -> Vec<NodeRef<'a>> {
    node.ancestors_it(None)
        .filter(NodeRef::is_element)
        .take(max_depth)
        .collect()
}

/// Lowercased `id` + `class` of a node, joined by a space.
#[must_use]
pub fn id_class(node: &NodeRef) -> String {
    let id = node.attr("id").map(|s| s.to_string()).unwrap_or_default();
    let class = node.attr("class").map(|s| s.to_string()).unwrap_or_default();
    format!("{id} {class}").to_lowercase()
}

// === Parsing ===

/// Parse HTML string into document
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}
