//! Generic field rules
//!
//! Fallback [`Rule`](super::Rule)s used when a platform profile has no hint
//! for a field, or its hints matched nothing. They key on the class/id
//! vocabulary that story sites share ("title", "author", "genre", …) and
//! only accept short leaf-ish elements so a page wrapper never matches.

use dom_query::Selection;

use super::utils;
use crate::dom;

/// Longest text a short-field element may carry.
const SHORT_TEXT_MAX: usize = 80;

fn has_short_text(sel: &Selection) -> bool {
    dom::normalized_text(sel).is_some_and(|text| text.chars().count() <= SHORT_TEXT_MAX)
}

fn outside_chrome(sel: &Selection) -> bool {
    sel.nodes().first().is_none_or(|node| {
        !dom::element_ancestors(node, 8).iter().any(|ancestor| {
            let name = ancestor.node_name().map(|n| n.to_string()).unwrap_or_default();
            matches!(name.as_str(), "nav" | "footer" | "header" | "aside")
        })
    })
}

/// Heading-like element whose class/id names it as the title.
pub fn is_title_heading(sel: &Selection) -> bool {
    utils::is_one_of_tags(sel, &["h1", "h2", "h3", "strong", "p", "div", "span"])
        && utils::contains_any(&utils::id_class(sel), &["title", "subject", "tit_"])
        && !utils::contains_any(&utils::id_class(sel), &["subtitle", "sub-title", "episode", "ep-title"])
        && has_short_text(sel)
        && outside_chrome(sel)
}

/// Any top-level heading outside page chrome.
pub fn is_main_heading(sel: &Selection) -> bool {
    utils::is_one_of_tags(sel, &["h1", "h2"]) && has_short_text(sel) && outside_chrome(sel)
}

/// Author / artist credit.
pub fn is_author_element(sel: &Selection) -> bool {
    utils::contains_any(&utils::id_class(sel), &["author", "writer", "artist", "creator", "wrt_nm"])
        && has_short_text(sel)
        && outside_chrome(sel)
}

/// Genre or category badge.
pub fn is_genre_element(sel: &Selection) -> bool {
    utils::contains_any(&utils::id_class(sel), &["genre", "category", "cate"])
        && !utils::is_one_of_tags(sel, &["ul", "ol", "nav"])
        && has_short_text(sel)
        && outside_chrome(sel)
}

/// Serialization status badge.
pub fn is_status_element(sel: &Selection) -> bool {
    utils::contains_any(&utils::id_class(sel), &["status", "state", "finish", "complete", "serial"])
        && has_short_text(sel)
        && outside_chrome(sel)
}

/// Audience-rating badge.
pub fn is_age_element(sel: &Selection) -> bool {
    utils::contains_any(&utils::id_class(sel), &["age", "grade", "rating", "adult"])
        && !utils::contains_any(&utils::id_class(sel), &["page", "image"])
        && has_short_text(sel)
}

/// One keyword/tag chip.
pub fn is_tag_element(sel: &Selection) -> bool {
    utils::is_one_of_tags(sel, &["a", "span", "li", "button"])
        && utils::contains_any(&utils::id_class(sel), &["tag", "keyword", "hashtag"])
        && sel.nodes().first().is_some_and(|node| node.element_children().is_empty())
        && has_short_text(sel)
        && outside_chrome(sel)
}

/// View / read counter.
pub fn is_view_element(sel: &Selection) -> bool {
    utils::contains_any(&utils::id_class(sel), &["view", "hit", "read_count", "readcount"])
        && !utils::contains_any(&utils::id_class(sel), &["preview", "review", "viewer"])
        && has_short_text(sel)
}

/// Publisher credit.
pub fn is_provider_element(sel: &Selection) -> bool {
    utils::contains_any(&utils::id_class(sel), &["publisher", "provider", "company"])
        && has_short_text(sel)
        && outside_chrome(sel)
}

/// Synopsis block.
pub fn is_description_element(sel: &Selection) -> bool {
    utils::contains_any(&utils::id_class(sel), &["synopsis", "summary", "introduce", "description", "story"])
        && !utils::is_one_of_tags(sel, &["section", "body", "main"])
        && dom::normalized_text(sel).is_some_and(|text| text.chars().count() >= 10)
        && outside_chrome(sel)
}

/// Entry of an episode list.
pub fn is_episode_item(sel: &Selection) -> bool {
    utils::is_one_of_tags(sel, &["li", "tr"])
        && utils::contains_any(&utils::id_class(sel), &["episode", "chapter", "ep_item", "volume"])
}
