//! Cover image selection.
//!
//! Every `<img>` on the page becomes a [`Candidate`]. Candidates that are
//! too small or carry an irrelevant keyword (icon, logo, banner, …) are
//! excluded outright; the rest are scored by summing the [`rules::RULES`]
//! list, and the highest score wins. Ties go to the earlier image in
//! document order.

pub mod rules;

use url::Url;

use crate::dom::{self, Document, NodeRef};
use crate::options::Options;
use crate::patterns::{
    CHROME_CONTAINER_KEYWORDS, COVER_CONTAINER_KEYWORDS, IRRELEVANT_IMAGE, MAIN_CONTAINER_KEYWORDS,
    STYLE_DIMENSION,
};
use crate::platform::PlatformProfile;
use crate::render::PageLayout;
use crate::result::ScrapeLog;
use crate::selector::utils::contains_any;
use crate::url_utils;

pub use rules::{CoverRule, RULES};

/// Attributes that may hold an image source, in preference order.
const SOURCE_ATTRIBUTES: &[&str] = &["src", "data-src", "data-original", "data-lazy-src", "data-url"];

/// Ancestor depth searched for main-content and chrome containers.
const STRUCTURE_DEPTH: usize = 32;

/// One `<img>` considered for the cover.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Position among the page's `<img>` elements.
    pub index: usize,
    /// Resolved absolute source URL.
    pub src: String,
    /// Lowercased path of `src`, without query.
    pub src_path: String,
    pub alt: String,
    pub class: String,
    pub id: String,
    pub title: String,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub top: Option<f64>,
    /// Lowercased "id class" of the nearest ancestors, nearest first.
    pub ancestors: Vec<String>,
    /// Inside `<main>`, `<article>`, `role=main` or a content-named container.
    pub in_main: bool,
    /// Inside navigation, sidebar, header or footer chrome.
    pub in_chrome: bool,
}

impl Candidate {
    /// Rendered area, when both dimensions are known.
    #[must_use]
    pub fn area(&self) -> Option<f64> {
        Some(self.width? * self.height?)
    }

    /// Height / width, when both dimensions are known and non-zero.
    #[must_use]
    pub fn aspect(&self) -> Option<f64> {
        let (w, h) = (self.width?, self.height?);
        (w > 0.0).then(|| h / w)
    }

    /// The image's own descriptive attributes, lowercased.
    #[must_use]
    pub fn attributes(&self) -> [&str; 4] {
        [&self.alt, &self.class, &self.id, &self.title]
    }
}

/// Inputs shared by every scoring rule.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub options: &'a Options,
    pub profile: &'static PlatformProfile,
    pub viewport_height: f64,
}

/// Why a candidate was excluded before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    TooSmall,
    IrrelevantKeyword,
}

/// A scored candidate with the per-rule breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub score: f64,
    pub breakdown: Vec<(&'static str, f64)>,
}

/// Collect every `<img>` with a usable source.
#[must_use]
pub fn candidates(doc: &Document, base: &Url, layout: &PageLayout, options: &Options) -> Vec<Candidate> {
    doc.select("img")
        .nodes()
        .iter()
        .enumerate()
        .filter_map(|(index, node)| build_candidate(index, node, base, layout, options))
        .collect()
}

fn build_candidate(index: usize, node: &NodeRef, base: &Url, layout: &PageLayout, options: &Options) -> Option<Candidate> {
    let raw_src = resolve_source(node)?;
    let src = url_utils::create_absolute_url(&raw_src, base);
    let lower_attr = |name: &str| dom::node_attribute(node, name).unwrap_or_default().to_lowercase();

    let measured = layout.image(index);
    let style = dom::node_attribute(node, "style").unwrap_or_default();
    let width = measured
        .width
        .or_else(|| declared_dimension(node, "width", &style));
    let height = measured
        .height
        .or_else(|| declared_dimension(node, "height", &style));

    let structural: Vec<NodeRef> = dom::element_ancestors(node, STRUCTURE_DEPTH);
    let ancestors: Vec<String> = structural
        .iter()
        .take(options.max_ancestor_depth)
        .map(|a| dom::id_class(a).trim().to_string())
        .collect();

    let in_main = structural.iter().any(is_main_container);
    let in_chrome = structural.iter().any(is_chrome_container);

    Some(Candidate {
        index,
        src_path: url_utils::source_path(&src),
        src,
        alt: lower_attr("alt"),
        class: lower_attr("class"),
        id: lower_attr("id"),
        title: lower_attr("title"),
        width,
        height,
        top: measured.top,
        ancestors,
        in_main,
        in_chrome,
    })
}

/// Source of an image: `src` unless it is missing or an inline placeholder,
/// then the lazy-loading attributes, then the first `srcset` entry.
fn resolve_source(node: &NodeRef) -> Option<String> {
    let from_attrs = SOURCE_ATTRIBUTES
        .iter()
        .filter_map(|attr| dom::node_attribute(node, attr))
        .find(|value| !value.starts_with("data:"));

    from_attrs.or_else(|| {
        dom::node_attribute(node, "srcset")
            .and_then(|set| set.split(',').next().map(str::to_string))
            .and_then(|entry| entry.split_whitespace().next().map(str::to_string))
            .filter(|src| !src.starts_with("data:"))
    })
}

fn declared_dimension(node: &NodeRef, name: &str, style: &str) -> Option<f64> {
    let from_attr = dom::node_attribute(node, name)
        .and_then(|v| v.trim_end_matches("px").trim().parse::<f64>().ok())
        .filter(|v| *v > 0.0);

    from_attr.or_else(|| {
        STYLE_DIMENSION
            .captures_iter(style)
            .find(|caps| caps[1].eq_ignore_ascii_case(name))
            .and_then(|caps| caps[2].parse::<f64>().ok())
    })
}

fn is_main_container(node: &NodeRef) -> bool {
    let tag = node.node_name().map(|n| n.to_string()).unwrap_or_default();
    matches!(tag.as_str(), "main" | "article")
        || dom::node_attribute(node, "role").is_some_and(|r| r.eq_ignore_ascii_case("main"))
        || contains_any(&dom::id_class(node), MAIN_CONTAINER_KEYWORDS)
}

fn is_chrome_container(node: &NodeRef) -> bool {
    let tag = node.node_name().map(|n| n.to_string()).unwrap_or_default();
    matches!(tag.as_str(), "nav" | "aside" | "footer" | "header")
        || contains_any(&dom::id_class(node), CHROME_CONTAINER_KEYWORDS)
}

/// Hard exclusion check, applied before scoring.
#[must_use]
pub fn exclusion(candidate: &Candidate, options: &Options) -> Option<Exclusion> {
    let floor = options.min_image_size;
    let too_small = candidate.width.is_some_and(|w| w < floor) || candidate.height.is_some_and(|h| h < floor);
    if too_small {
        return Some(Exclusion::TooSmall);
    }

    let irrelevant = candidate
        .attributes()
        .iter()
        .chain(std::iter::once(&candidate.src_path.as_str()))
        .any(|text| IRRELEVANT_IMAGE.is_match(text));
    irrelevant.then_some(Exclusion::IrrelevantKeyword)
}

/// Score a candidate against every rule.
#[must_use]
pub fn score(candidate: &Candidate, ctx: &ScoringContext<'_>) -> ScoredCandidate {
    let breakdown: Vec<(&'static str, f64)> = RULES
        .iter()
        .map(|rule| (rule.name, (rule.apply)(candidate, ctx)))
        .filter(|(_, points)| *points != 0.0)
        .collect();
    let score = breakdown.iter().map(|(_, points)| points).sum();

    ScoredCandidate {
        candidate: candidate.clone(),
        score,
        breakdown,
    }
}

/// Pick the best-scoring surviving candidate.
///
/// Only a strictly greater score replaces the current best, so equal scores
/// resolve to document order.
#[must_use]
pub fn best(candidates: &[Candidate], ctx: &ScoringContext<'_>) -> Option<ScoredCandidate> {
    let mut best: Option<ScoredCandidate> = None;
    for candidate in candidates {
        if exclusion(candidate, ctx.options).is_some() {
            continue;
        }
        let scored = score(candidate, ctx);
        if best.as_ref().is_none_or(|b| scored.score > b.score) {
            best = Some(scored);
        }
    }
    best
}

/// Select the cover image URL for a page.
pub fn select_cover(
    doc: &Document,
    base: &Url,
    layout: &PageLayout,
    profile: &'static PlatformProfile,
    options: &Options,
    log: &mut ScrapeLog,
) -> Option<String> {
    let all = candidates(doc, base, layout, options);
    let excluded = all.iter().filter(|c| exclusion(c, options).is_some()).count();
    log.push(format!("cover: {} candidates, {excluded} excluded", all.len()));

    let ctx = ScoringContext {
        options,
        profile,
        viewport_height: layout.viewport_height.unwrap_or(options.viewport_height),
    };

    match best(&all, &ctx) {
        Some(winner) => {
            let rules = winner
                .breakdown
                .iter()
                .map(|(name, points)| format!("{name}={points:.0}"))
                .collect::<Vec<_>>()
                .join(", ");
            log.push(format!("cover: selected {} (score {:.1}; {rules})", winner.candidate.src, winner.score));
            Some(winner.candidate.src)
        }
        None => {
            log.push("cover: no candidate survived exclusion");
            None
        }
    }
}

/// Whether an ancestor's id/class names an image or cover wrapper.
#[must_use]
pub fn in_cover_container(candidate: &Candidate) -> bool {
    candidate
        .ancestors
        .iter()
        .any(|id_class| contains_any(id_class, COVER_CONTAINER_KEYWORDS))
}
