//! Selector Infrastructure
//!
//! Two ways of locating a field on a page:
//!
//! - platform [`Hint`]s (CSS selectors, visible labels, meta keys) resolved
//!   by [`hint_values`], and
//! - generic [`Rule`]s from [`fields`], predicate functions used when no
//!   hint matched.

use dom_query::Selection;

use crate::dom::{self, Document};
use crate::error::Result;
use crate::platform::Hint;

pub mod fields;
pub mod utils;

/// A selector rule that tests if a selection matches certain criteria
///
/// Rules are simple predicate functions used by the extractors' generic
/// fallbacks to recognize headings, author credits, tag chips and so on.
pub type Rule = fn(&Selection) -> bool;

/// Query for first element matching the rule
///
/// Iterates through all descendants in document order and returns the first
/// element for which the rule returns true.
///
/// # Example
///
/// ```rust
/// use rs_storyscrape::selector::{self, utils};
/// use rs_storyscrape::dom;
///
/// let doc = dom::parse(r#"<div><p class="content">text</p></div>"#);
/// let root = doc.select("div");
///
/// fn has_content_class(sel: &dom_query::Selection) -> bool {
///     utils::class(sel).contains("content")
/// }
///
/// let result = selector::query(&root, has_content_class);
/// assert!(result.is_some());
/// ```
#[must_use]
pub fn query<'a>(root: &Selection<'a>, rule: Rule) -> Option<Selection<'a>> {
    root.select("*")
        .nodes()
        .iter()
        .map(|node| Selection::from(*node))
        .find(|sel| rule(sel))
}

/// Query for all elements matching the rule, in document order.
///
/// # Example
///
/// ```rust
/// use rs_storyscrape::selector::{self, utils};
/// use rs_storyscrape::dom;
///
/// let doc = dom::parse(r#"<div><p class="item">1</p><p class="item">2</p></div>"#);
/// let root = doc.select("div");
///
/// fn has_item_class(sel: &dom_query::Selection) -> bool {
///     utils::class(sel).contains("item")
/// }
///
/// let results = selector::query_all(&root, has_item_class);
/// assert_eq!(results.len(), 2);
/// ```
#[must_use]
pub fn query_all<'a>(root: &Selection<'a>, rule: Rule) -> Vec<Selection<'a>> {
    root.select("*")
        .nodes()
        .iter()
        .map(|node| Selection::from(*node))
        .filter(|sel| rule(sel))
        .collect()
}

/// Text of the first element in the document matching `rule`.
#[must_use]
pub fn first_rule_text(doc: &Document, rule: Rule) -> Option<String> {
    query_all(&doc.select("body"), rule)
        .iter()
        .find_map(dom::normalized_text)
}

/// Texts of every element in the document matching `rule`.
#[must_use]
pub fn rule_texts(doc: &Document, rule: Rule) -> Vec<String> {
    query_all(&doc.select("body"), rule)
        .iter()
        .filter_map(dom::normalized_text)
        .collect()
}

/// Elements that may carry a visible label.
const LABEL_TAGS: &str = "dt, th, td, dd, li, span, strong, em, b, label, p, div, h4, h5";

/// Resolve a hint to every non-empty value it yields, in document order.
///
/// Fails only when a CSS hint does not compile.
pub fn hint_values(doc: &Document, hint: &Hint) -> Result<Vec<String>> {
    match hint {
        Hint::Css(selector) => Ok(dom::select_all(doc, selector)?
            .nodes()
            .iter()
            .filter_map(|node| element_value(&Selection::from(*node)))
            .collect()),
        Hint::Label(label) => Ok(label_values(doc, label)),
        Hint::Meta(key) => Ok(dom::meta_content(doc, key).into_iter().collect()),
    }
}

/// Visible text of an element, or for text-less elements (badges, icons)
/// their `alt`, `aria-label` or `title`.
fn element_value(sel: &Selection) -> Option<String> {
    dom::normalized_text(sel).or_else(|| {
        ["alt", "aria-label", "title"]
            .iter()
            .find_map(|attr| dom::get_attribute(sel, attr))
            .map(|value| dom::normalize_whitespace(&value))
    })
}

/// First value a hint yields.
pub fn hint_value(doc: &Document, hint: &Hint) -> Result<Option<String>> {
    Ok(hint_values(doc, hint)?.into_iter().next())
}

/// Values attached to a visible label.
///
/// Two layouts are recognized: the label alone in one element with the value
/// in the next element sibling (`<dt>장르</dt><dd>판타지</dd>`), and label
/// and value in the same leaf element (`<span>장르 : 판타지</span>`).
#[must_use]
pub fn label_values(doc: &Document, label: &str) -> Vec<String> {
    let mut values = Vec::new();

    for node in doc.select(LABEL_TAGS).nodes() {
        let sel = Selection::from(*node);
        let Some(text) = dom::normalized_text(&sel) else {
            continue;
        };

        if utils::is_label(&text, label) {
            if let Some(value) = utils::next_element(node)
                .and_then(|next| dom::normalized_text(&Selection::from(next)))
            {
                values.push(value);
            }
        } else if node.element_children().is_empty() {
            if let Some(value) = utils::inline_label_value(&text, label) {
                values.push(value);
            }
        }
    }

    values
}
