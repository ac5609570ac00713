//! Cover scoring rules.
//!
//! Each rule is a named pure function of a candidate and the scoring context.
//! A candidate's score is the sum over [`RULES`].

use super::{in_cover_container, Candidate, ScoringContext};
use crate::patterns::COVER_KEYWORDS;
use crate::selector::utils::contains_any;

/// Bonus per descriptive attribute naming cover art.
pub const KEYWORD_ATTRIBUTE_BONUS: f64 = 100.0;
pub const KEYWORD_SOURCE_BONUS: f64 = 50.0;
pub const TALL_ASPECT_BONUS: f64 = 50.0;
/// Minimum height/width ratio counted as a portrait cover.
pub const TALL_ASPECT_RATIO: f64 = 1.2;
/// Height/width range counted as near-square.
pub const SQUARE_ASPECT_RANGE: (f64, f64) = (0.8, 1.25);
pub const VIEWPORT_BAND_BONUS: f64 = 30.0;
pub const AREA_BONUS_MAX: f64 = 50.0;
pub const COVER_CONTAINER_BONUS: f64 = 75.0;
pub const MAIN_CONTENT_BONUS: f64 = 40.0;

/// A named scoring rule.
#[derive(Clone, Copy)]
pub struct CoverRule {
    pub name: &'static str,
    pub apply: fn(&Candidate, &ScoringContext<'_>) -> f64,
}

impl std::fmt::Debug for CoverRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoverRule").field("name", &self.name).finish()
    }
}

/// All rules, in the order their contributions are reported.
pub static RULES: &[CoverRule] = &[
    CoverRule {
        name: "keyword_attributes",
        apply: keyword_attributes,
    },
    CoverRule {
        name: "keyword_source",
        apply: keyword_source,
    },
    CoverRule {
        name: "aspect",
        apply: aspect,
    },
    CoverRule {
        name: "viewport_band",
        apply: viewport_band,
    },
    CoverRule {
        name: "area",
        apply: area,
    },
    CoverRule {
        name: "cover_container",
        apply: cover_container,
    },
    CoverRule {
        name: "main_content",
        apply: main_content,
    },
    CoverRule {
        name: "profile_position",
        apply: profile_position,
    },
    CoverRule {
        name: "profile_content_class",
        apply: profile_content_class,
    },
];

fn keyword_attributes(c: &Candidate, _: &ScoringContext<'_>) -> f64 {
    let hits = c
        .attributes()
        .iter()
        .filter(|text| contains_any(text, COVER_KEYWORDS))
        .count();
    KEYWORD_ATTRIBUTE_BONUS * hits as f64
}

fn keyword_source(c: &Candidate, _: &ScoringContext<'_>) -> f64 {
    if contains_any(&c.src_path, COVER_KEYWORDS) {
        KEYWORD_SOURCE_BONUS
    } else {
        0.0
    }
}

/// Tall covers by default; profiles that lay covers out as squares swap the
/// tall bonus for a near-square one.
fn aspect(c: &Candidate, ctx: &ScoringContext<'_>) -> f64 {
    let Some(ratio) = c.aspect() else {
        return 0.0;
    };
    match ctx.profile.cover.square_bonus {
        Some(bonus) => {
            let (low, high) = SQUARE_ASPECT_RANGE;
            if (low..=high).contains(&ratio) {
                bonus
            } else {
                0.0
            }
        }
        None if ratio > TALL_ASPECT_RATIO => TALL_ASPECT_BONUS,
        None => 0.0,
    }
}

fn viewport_band(c: &Candidate, ctx: &ScoringContext<'_>) -> f64 {
    match c.top {
        Some(top) if top >= ctx.options.chrome_height && top <= ctx.viewport_height => VIEWPORT_BAND_BONUS,
        _ => 0.0,
    }
}

/// Linear in area across the plausible band, zero outside it.
fn area(c: &Candidate, ctx: &ScoringContext<'_>) -> f64 {
    let (min, max) = ctx.options.area_band;
    match c.area() {
        Some(area) if area >= min && area <= max && max > min => AREA_BONUS_MAX * (area - min) / (max - min),
        _ => 0.0,
    }
}

fn cover_container(c: &Candidate, _: &ScoringContext<'_>) -> f64 {
    if in_cover_container(c) {
        COVER_CONTAINER_BONUS
    } else {
        0.0
    }
}

fn main_content(c: &Candidate, _: &ScoringContext<'_>) -> f64 {
    if c.in_main && !c.in_chrome {
        MAIN_CONTENT_BONUS
    } else {
        0.0
    }
}

fn profile_position(c: &Candidate, ctx: &ScoringContext<'_>) -> f64 {
    let Some(top) = c.top else {
        return 0.0;
    };
    let tuning = &ctx.profile.cover;
    let high = tuning
        .high_bonus
        .filter(|adj| top <= adj.threshold)
        .map_or(0.0, |adj| adj.score);
    let deep = tuning
        .deep_penalty
        .filter(|adj| top > adj.threshold)
        .map_or(0.0, |adj| adj.score);
    high + deep
}

fn profile_content_class(c: &Candidate, ctx: &ScoringContext<'_>) -> f64 {
    match ctx.profile.cover.content_class {
        Some((name, bonus)) if c.ancestors.iter().any(|id_class| id_class.contains(name)) => bonus,
        _ => 0.0,
    }
}
