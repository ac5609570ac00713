//! Compiled regex patterns and keyword tables used by the extractors.
//!
//! All patterns are compiled once at first use via `LazyLock`.
//! Patterns are organized by the component that consumes them.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Magnitude Numerals
// =============================================================================

/// A decimal number (thousands separators allowed) optionally followed by a
/// scale marker: 천 (10^3), 만 (10^4), 억 (10^8), or Latin K/M/B.
pub static MAGNITUDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,3}(?:,\d{3})+|\d+)(?:\.(\d+))?\s*(천|만|억|[kKmMbB])?$")
        .expect("MAGNITUDE regex")
});

/// Numeral-bearing token inside free text, used to locate a view count.
pub static NUMERAL_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?\s*(?:천|만|억|[kKmMbB]\b)?")
        .expect("NUMERAL_TOKEN regex")
});

/// View-count label followed by a numeral, e.g. "조회 13.7만", "Views: 1.2M".
pub static VIEW_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:조회수?|열람|누적\s*조회|views?|reads?)\s*[:：]?\s*((?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?\s*(?:천|만|억|[kmb]\b)?)")
        .expect("VIEW_LABEL regex")
});

// =============================================================================
// Chapter Count / Status / Rating
// =============================================================================

/// Explicit chapter totals: "총 120화", "120화 완결", "全120話", "120 episodes".
pub static CHAPTER_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:총|全)?\s*(\d{1,5})\s*(?:화|회|권|話|episodes?|chapters?|eps?\b)")
        .expect("CHAPTER_COUNT regex")
});

/// Audience rating markers: "15세 이용가", "19세", "18+".
pub static AGE_RATING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{2})\s*(?:세|\+)").expect("AGE_RATING regex")
});

// =============================================================================
// Authorship
// =============================================================================

/// Role-labelled author segments: "글 홍길동", "그림: 김철수", "글/그림 SIU",
/// "원작 작가명", "Writer Foo".
pub static AUTHOR_ROLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(글\s*/\s*그림|글·그림|글&그림|글|그림|작화|원작|각색|writer|artist|illustrator|original(?:\s+author)?|story|art)(?:\s*[:：]\s*|\s+)([^/|,\n]+)",
    )
    .expect("AUTHOR_ROLE regex")
});

// =============================================================================
// Text Cleaning
// =============================================================================

/// Matches multiple whitespace characters for normalization.
pub static WHITESPACE_NORMALIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").expect("WHITESPACE_NORMALIZE regex")
});

/// Separators between a story title and a platform suffix in `og:title`.
pub static TITLE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+[\|–—\-:]\s+|\s*\|\s*").expect("TITLE_SEPARATOR regex")
});

/// Pixel dimensions declared in an inline style attribute.
pub static STYLE_DIMENSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(width|height)\s*:\s*(\d+(?:\.\d+)?)px").expect("STYLE_DIMENSION regex")
});

// =============================================================================
// Cover Image Keywords
// =============================================================================

/// Keywords that hard-exclude an image from cover selection. Long keywords
/// match anywhere, so "siteLogo" and "mainBanner" are caught; the short ones
/// ("ad", "nav", "btn", ...) only on token boundaries so that e.g. "upload"
/// or "shadow" do not trip them.
pub static IRRELEVANT_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:icon|logo|avatar|profile[-_]?img|button|banner|menu|header|footer|emoticon|badge|advert)|(?:^|[^a-z])(?:ads?|nav|gnb|lnb|btn)(?:[^a-z]|$)",
    )
    .expect("IRRELEVANT_IMAGE regex")
});

/// Substrings that mark an image (or its source path) as cover art.
pub const COVER_KEYWORDS: &[&str] = &[
    "cover", "poster", "thumbnail", "thumb", "series", "title", "book", "webtoon", "comic",
    "novel", "manga", "toon", "keyvisual", "표지",
];

/// Substrings that mark an ancestor as a cover/image wrapper.
pub const COVER_CONTAINER_KEYWORDS: &[&str] =
    &["cover", "poster", "thumbnail", "thumb", "image", "img", "visual"];

/// Substrings that mark an ancestor as the main content container.
pub const MAIN_CONTAINER_KEYWORDS: &[&str] =
    &["content", "main", "detail", "info", "product", "work", "series", "episode-home"];

/// Substrings that mark an ancestor as navigation/sidebar/footer chrome.
pub const CHROME_CONTAINER_KEYWORDS: &[&str] = &[
    "nav", "gnb", "lnb", "sidebar", "side-bar", "aside", "footer", "recommend", "related",
    "ranking", "banner",
];

// =============================================================================
// Generic Label Vocabulary
// =============================================================================

/// Labels preceding a genre value.
pub const GENRE_LABELS: &[&str] = &["장르", "genre", "genres"];

/// Labels preceding a content provider / publisher value.
pub const PROVIDER_LABELS: &[&str] = &["출판사", "제공", "발행", "publisher", "provider", "cp"];

/// Suffixes appended to `og:title` by platforms, stripped from title candidates.
pub const PLATFORM_TITLE_SUFFIXES: &[&str] = &[
    "네이버 웹툰", "네이버 시리즈", "카카오페이지", "카카오웹툰", "리디", "리디북스", "문피아",
    "노벨피아", "레진코믹스", "봄툰", "webtoon", "naver webtoon",
];
