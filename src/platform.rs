//! Platform profiles and URL → profile resolution.
//!
//! A [`PlatformProfile`] is plain data: selector and label hints for each
//! field plus cover-scoring adjustments. Every extractor and the cover
//! selector consume profiles the same way, so supporting a new site means
//! adding one entry to [`REGISTRY`], not new control flow.

use url::Url;

use crate::result::{AuthorRole, Format};
use crate::url_utils;

/// Version of the built-in registry. Bump when profiles change in a way
/// that can alter stored snapshots.
pub const REGISTRY_VERSION: u32 = 4;

/// Where a field value may be found on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hint {
    /// Text of every element matching a CSS selector.
    Css(&'static str),
    /// Value following a visible label ("장르", "출판사 :", …), either in the
    /// same element after the label or in the next element sibling.
    Label(&'static str),
    /// `content` of a `<meta>` tag with this `property`/`name`.
    Meta(&'static str),
}

/// An authorship hint, optionally bound to a role.
///
/// With `role: None` the matched text is split on role markers
/// ("글", "그림", "원작", …); unmarked text credits the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorHint {
    pub hint: Hint,
    pub role: Option<AuthorRole>,
}

/// Field hints in priority order. Empty slices fall straight through to
/// the generic heuristics.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldHints {
    pub title: &'static [Hint],
    pub title_en: &'static [Hint],
    pub authors: &'static [AuthorHint],
    pub genre: &'static [Hint],
    pub tags: &'static [Hint],
    pub status: &'static [Hint],
    pub age_rating: &'static [Hint],
    pub chapter_count: &'static [Hint],
    /// Selector for one entry of the episode list; the number of matches
    /// stands in for a missing chapter count.
    pub episode_item: Option<&'static str>,
    pub views: &'static [Hint],
    pub provider: &'static [Hint],
    pub description: &'static [Hint],
}

/// A positional score adjustment keyed on an image's top offset (px).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionAdjustment {
    pub threshold: f64,
    pub score: f64,
}

/// Platform-specific cover-scoring parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CoverTuning {
    /// Added when the image's top is at or above `threshold`.
    pub high_bonus: Option<PositionAdjustment>,
    /// Added (negative) when the image's top is below `threshold`.
    pub deep_penalty: Option<PositionAdjustment>,
    /// Replaces the tall-aspect bonus with a bonus for near-square images.
    pub square_bonus: Option<f64>,
    /// Bonus when an ancestor's class/id contains this (lowercase) name.
    pub content_class: Option<(&'static str, f64)>,
}

/// A supported publishing site.
#[derive(Debug, Clone, Copy)]
pub struct PlatformProfile {
    /// Stable identifier, used in logs and result metadata.
    pub key: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Host patterns matched against the normalized hostname.
    pub hosts: &'static [&'static str],
    /// Format every title on the site has, if uniform.
    pub default_format: Option<Format>,
    /// Format implied by a URL path fragment, checked before text heuristics.
    pub format_by_path: &'static [(&'static str, Format)],
    pub hints: FieldHints,
    pub cover: CoverTuning,
}

impl PlatformProfile {
    /// Whether this profile is the generic fallback.
    #[must_use]
    pub fn is_generic(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Length of the longest host pattern matching `host`, if any.
    fn match_len(&self, host: &str) -> Option<usize> {
        self.hosts
            .iter()
            .filter(|pattern| host.contains(**pattern))
            .map(|pattern| pattern.len())
            .max()
    }
}

/// Profile used when no host pattern matches.
pub static GENERIC: PlatformProfile = PlatformProfile {
    key: "generic",
    name: "Generic",
    hosts: &[],
    default_format: None,
    format_by_path: &[],
    hints: FieldHints {
        title: &[],
        title_en: &[],
        authors: &[],
        genre: &[],
        tags: &[],
        status: &[],
        age_rating: &[],
        chapter_count: &[],
        episode_item: None,
        views: &[],
        provider: &[],
        description: &[],
    },
    cover: CoverTuning {
        high_bonus: None,
        deep_penalty: None,
        square_bonus: None,
        content_class: None,
    },
};

/// Built-in profiles.
pub static REGISTRY: &[PlatformProfile] = &[
    PlatformProfile {
        key: "naver_webtoon",
        name: "Naver Webtoon",
        hosts: &["comic.naver.com"],
        default_format: Some(Format::Webtoon),
        format_by_path: &[],
        hints: FieldHints {
            title: &[
                Hint::Css("[class*='EpisodeListInfo__title']"),
                Hint::Css(".comicinfo .detail h2"),
            ],
            title_en: &[],
            authors: &[
                AuthorHint { hint: Hint::Css("[class*='ContentMetaInfo__category'] [class*='ContentMetaInfo__link']"), role: None },
                AuthorHint { hint: Hint::Css(".comicinfo .wrt_nm"), role: None },
            ],
            genre: &[Hint::Css("[class*='ContentMetaInfo__info_item'] .genre"), Hint::Css(".detail .genre")],
            tags: &[Hint::Css("[class*='TagGroup__tag']")],
            status: &[Hint::Css("[class*='EpisodeListInfo__status']"), Hint::Css(".detail .ico_finish")],
            age_rating: &[Hint::Css("[class*='ContentMetaInfo__info_item'] .age")],
            chapter_count: &[Hint::Css("[class*='EpisodeListView__count']")],
            episode_item: Some("[class*='EpisodeListList__item']"),
            views: &[],
            provider: &[],
            description: &[Hint::Css("[class*='EpisodeListInfo__summary']")],
        },
        cover: CoverTuning {
            high_bonus: Some(PositionAdjustment { threshold: 600.0, score: 80.0 }),
            deep_penalty: Some(PositionAdjustment { threshold: 1500.0, score: -80.0 }),
            square_bonus: None,
            content_class: Some(("episodelistinfo", 60.0)),
        },
    },
    PlatformProfile {
        key: "naver_series",
        name: "Naver Series",
        hosts: &["series.naver.com"],
        default_format: None,
        format_by_path: &[("/novel/", Format::WebNovel), ("/comic/", Format::Comic), ("/ebook/", Format::Ebook)],
        hints: FieldHints {
            title: &[Hint::Css(".end_head h2")],
            title_en: &[],
            authors: &[
                AuthorHint { hint: Hint::Label("글"), role: Some(AuthorRole::Writer) },
                AuthorHint { hint: Hint::Label("그림"), role: Some(AuthorRole::Illustrator) },
                AuthorHint { hint: Hint::Label("원작"), role: Some(AuthorRole::Original) },
                AuthorHint { hint: Hint::Label("저자"), role: Some(AuthorRole::Writer) },
            ],
            genre: &[Hint::Label("장르")],
            tags: &[],
            status: &[Hint::Css(".end_head .ico_finish"), Hint::Css(".end_info .info_lst li:first-child")],
            age_rating: &[Hint::Label("이용가")],
            chapter_count: &[Hint::Css("h5.end_total_episode")],
            episode_item: Some(".end_list_wrap li.volume_row"),
            views: &[],
            provider: &[Hint::Label("출판사")],
            description: &[Hint::Css(".end_dsc ._synopsis")],
        },
        cover: CoverTuning {
            high_bonus: Some(PositionAdjustment { threshold: 500.0, score: 60.0 }),
            deep_penalty: Some(PositionAdjustment { threshold: 1400.0, score: -60.0 }),
            square_bonus: None,
            content_class: Some(("end_head", 50.0)),
        },
    },
    PlatformProfile {
        key: "kakao_page",
        name: "KakaoPage",
        hosts: &["page.kakao.com"],
        default_format: None,
        format_by_path: &[],
        hints: FieldHints {
            title: &[Hint::Css("span.font-large3-bold"), Hint::Meta("og:title")],
            title_en: &[],
            authors: &[AuthorHint { hint: Hint::Css("span.font-small2.text-el-70.opacity-70"), role: None }],
            genre: &[Hint::Css("span.break-all.align-middle")],
            tags: &[Hint::Css("a[href*='keyword'] span")],
            status: &[Hint::Css("span.font-small2.mb-6pxr")],
            age_rating: &[Hint::Css("img[alt*='세']"), Hint::Label("이용가")],
            chapter_count: &[Hint::Css("span.text-el-70.font-small2-bold")],
            episode_item: Some("ul.jsx-episode-list li"),
            views: &[Hint::Css("img[alt*='열람'] + span"), Hint::Label("조회")],
            provider: &[Hint::Label("발행자"), Hint::Label("출판사")],
            description: &[Hint::Meta("og:description")],
        },
        cover: CoverTuning {
            high_bonus: Some(PositionAdjustment { threshold: 700.0, score: 70.0 }),
            deep_penalty: Some(PositionAdjustment { threshold: 1600.0, score: -90.0 }),
            square_bonus: None,
            content_class: Some(("content-home", 50.0)),
        },
    },
    PlatformProfile {
        key: "kakao_webtoon",
        name: "Kakao Webtoon",
        hosts: &["webtoon.kakao.com"],
        default_format: Some(Format::Webtoon),
        format_by_path: &[],
        hints: FieldHints {
            title: &[Hint::Css("p.whitespace-pre-wrap.break-all.s22-semibold-white"), Hint::Meta("og:title")],
            title_en: &[],
            authors: &[AuthorHint { hint: Hint::Css("dl.mt-16 dd"), role: None }],
            genre: &[Hint::Css("p.s12-regular-white.ml-3")],
            tags: &[Hint::Css("a[href*='/keyword/'] p")],
            status: &[Hint::Css("p.s12-regular-white.opacity-75")],
            age_rating: &[],
            chapter_count: &[],
            episode_item: Some("ul.episode-list li"),
            views: &[Hint::Css("p.s12-regular-white.ml-2")],
            provider: &[],
            description: &[Hint::Meta("og:description")],
        },
        cover: CoverTuning {
            high_bonus: Some(PositionAdjustment { threshold: 800.0, score: 60.0 }),
            deep_penalty: Some(PositionAdjustment { threshold: 1600.0, score: -80.0 }),
            square_bonus: Some(60.0),
            content_class: None,
        },
    },
    PlatformProfile {
        key: "ridi",
        name: "RIDI",
        hosts: &["ridibooks.com", "ridi.com"],
        default_format: None,
        format_by_path: &[("/books/", Format::Ebook)],
        hints: FieldHints {
            title: &[Hint::Css("h1.info_title_wrap"), Hint::Css("[class*='Title'] h1")],
            title_en: &[],
            authors: &[
                AuthorHint { hint: Hint::Css(".metadata_writer .author_detail_link"), role: Some(AuthorRole::Writer) },
                AuthorHint { hint: Hint::Css(".metadata_writer .illustrator_detail_link"), role: Some(AuthorRole::Illustrator) },
                AuthorHint { hint: Hint::Css(".metadata_writer .original_author_detail_link"), role: Some(AuthorRole::Original) },
            ],
            genre: &[Hint::Css("p.info_category_wrap a:last-child")],
            tags: &[Hint::Css(".keyword_list a")],
            status: &[Hint::Css(".metadata_info_series_complete_wrap")],
            age_rating: &[Hint::Css(".badge_adult")],
            chapter_count: &[Hint::Css(".metadata_info_series_complete_wrap")],
            episode_item: None,
            views: &[],
            provider: &[Hint::Css("a.publisher_detail_link")],
            description: &[Hint::Css("#introduce_book p.introduce_paragraph")],
        },
        cover: CoverTuning {
            high_bonus: Some(PositionAdjustment { threshold: 600.0, score: 50.0 }),
            deep_penalty: Some(PositionAdjustment { threshold: 1500.0, score: -70.0 }),
            square_bonus: None,
            content_class: Some(("header_thumbnail_wrap", 80.0)),
        },
    },
    PlatformProfile {
        key: "munpia",
        name: "Munpia",
        hosts: &["munpia.com"],
        default_format: Some(Format::WebNovel),
        format_by_path: &[],
        hints: FieldHints {
            title: &[Hint::Css(".detail-box h2 a"), Hint::Css(".detail-box h2")],
            title_en: &[],
            authors: &[AuthorHint { hint: Hint::Css(".detail-box .member-trigger strong"), role: Some(AuthorRole::Writer) }],
            genre: &[Hint::Css(".detail-box .meta-path strong")],
            tags: &[Hint::Css(".story-box .tag-list a")],
            status: &[Hint::Css(".detail-box .xui-finish"), Hint::Css(".detail-box .meta-etc dd:first-of-type")],
            age_rating: &[],
            chapter_count: &[Hint::Label("연재수")],
            episode_item: Some("#ENTRIES tbody tr"),
            views: &[Hint::Label("조회수")],
            provider: &[],
            description: &[Hint::Css(".story-box .story")],
        },
        cover: CoverTuning {
            high_bonus: Some(PositionAdjustment { threshold: 650.0, score: 60.0 }),
            deep_penalty: None,
            square_bonus: None,
            content_class: Some(("cover-box", 70.0)),
        },
    },
    PlatformProfile {
        key: "novelpia",
        name: "Novelpia",
        hosts: &["novelpia.com"],
        default_format: Some(Format::WebNovel),
        format_by_path: &[],
        hints: FieldHints {
            title: &[Hint::Css(".epnew-novel-title")],
            title_en: &[],
            authors: &[AuthorHint { hint: Hint::Css(".epnew-writer .writer-name"), role: Some(AuthorRole::Writer) }],
            genre: &[],
            tags: &[Hint::Css(".writer-tag .tag")],
            status: &[Hint::Css(".epnew-novel-info .b_comp"), Hint::Css(".epnew-novel-info .s_inv")],
            age_rating: &[Hint::Css(".epnew-novel-info .b_19")],
            chapter_count: &[Hint::Label("회차")],
            episode_item: Some("#episode_list tr.ep_style5"),
            views: &[Hint::Label("조회수"), Hint::Css(".counter-line-a span:first-child")],
            provider: &[],
            description: &[Hint::Css(".synopsis")],
        },
        cover: CoverTuning {
            high_bonus: Some(PositionAdjustment { threshold: 600.0, score: 60.0 }),
            deep_penalty: Some(PositionAdjustment { threshold: 1400.0, score: -60.0 }),
            square_bonus: None,
            content_class: Some(("epnew-cover", 70.0)),
        },
    },
    PlatformProfile {
        key: "lezhin",
        name: "Lezhin Comics",
        hosts: &["lezhin.com"],
        default_format: Some(Format::Webtoon),
        format_by_path: &[],
        hints: FieldHints {
            title: &[Hint::Css("h2.comicInfo__title")],
            title_en: &[],
            authors: &[AuthorHint { hint: Hint::Css(".comicInfo__artist a"), role: None }],
            genre: &[Hint::Css(".comicInfo__cate")],
            tags: &[Hint::Css(".comicInfo__tags a")],
            status: &[Hint::Css(".comicInfo__status")],
            age_rating: &[],
            chapter_count: &[],
            episode_item: Some("ul.episode-list li"),
            views: &[],
            provider: &[],
            description: &[Hint::Css(".comicInfo__synopsis")],
        },
        cover: CoverTuning {
            high_bonus: Some(PositionAdjustment { threshold: 700.0, score: 50.0 }),
            deep_penalty: Some(PositionAdjustment { threshold: 1500.0, score: -70.0 }),
            square_bonus: Some(50.0),
            content_class: Some(("comicinfo", 60.0)),
        },
    },
    PlatformProfile {
        key: "bomtoon",
        name: "Bomtoon",
        hosts: &["bomtoon.com"],
        default_format: Some(Format::Webtoon),
        format_by_path: &[],
        hints: FieldHints {
            title: &[Hint::Css(".detail_title h1"), Hint::Meta("og:title")],
            title_en: &[],
            authors: &[AuthorHint { hint: Hint::Css(".detail_author"), role: None }],
            genre: &[Hint::Css(".detail_genre")],
            tags: &[Hint::Css(".detail_tags span")],
            status: &[Hint::Css(".detail_status")],
            age_rating: &[],
            chapter_count: &[],
            episode_item: Some(".episode_list li"),
            views: &[],
            provider: &[],
            description: &[Hint::Css(".detail_synopsis")],
        },
        cover: CoverTuning {
            high_bonus: Some(PositionAdjustment { threshold: 700.0, score: 50.0 }),
            deep_penalty: None,
            square_bonus: None,
            content_class: Some(("detail_cover", 60.0)),
        },
    },
];

/// Resolve the profile for a URL.
///
/// The hostname is normalized (lowercase, `www.` stripped) and matched
/// against each profile's host patterns; the longest matching pattern wins.
/// Unknown hosts resolve to [`GENERIC`].
#[must_use]
pub fn resolve(url: &Url) -> &'static PlatformProfile {
    let Some(host) = url.host_str().map(url_utils::normalize_hostname) else {
        return &GENERIC;
    };

    REGISTRY
        .iter()
        .filter_map(|profile| profile.match_len(&host).map(|len| (len, profile)))
        .max_by_key(|(len, _)| *len)
        .map_or(&GENERIC, |(_, profile)| profile)
}

/// Resolve a profile by its key (used by CLIs to force a profile).
#[must_use]
pub fn by_key(key: &str) -> Option<&'static PlatformProfile> {
    if key == GENERIC.key {
        return Some(&GENERIC);
    }
    REGISTRY.iter().find(|profile| profile.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;

    fn profile_for(url: &str) -> &'static str {
        let url = Url::parse(url).expect("valid url");
        resolve(&url).key
    }

    #[test]
    fn resolves_known_hosts() {
        assert_eq!(profile_for("https://comic.naver.com/webtoon/list?titleId=183559"), "naver_webtoon");
        assert_eq!(profile_for("https://m.comic.naver.com/webtoon/list?titleId=1"), "naver_webtoon");
        assert_eq!(profile_for("https://series.naver.com/novel/detail.series?productNo=1"), "naver_series");
        assert_eq!(profile_for("https://page.kakao.com/content/48933630"), "kakao_page");
        assert_eq!(profile_for("https://webtoon.kakao.com/content/x/1"), "kakao_webtoon");
        assert_eq!(profile_for("https://WWW.RIDIBOOKS.COM/books/1"), "ridi");
        assert_eq!(profile_for("https://novel.munpia.com/123"), "munpia");
    }

    #[test]
    fn unknown_hosts_fall_back_to_generic() {
        let url = Url::parse("https://example.org/story/1").expect("valid url");
        let profile = resolve(&url);
        assert!(profile.is_generic());
        assert_eq!(profile.key, "generic");
    }

    #[test]
    fn keys_are_unique_and_lookup_works() {
        let mut keys: Vec<_> = REGISTRY.iter().map(|p| p.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), REGISTRY.len());
        assert_eq!(by_key("munpia").map(|p| p.name), Some("Munpia"));
        assert!(by_key("generic").is_some_and(PlatformProfile::is_generic));
        assert!(by_key("nope").is_none());
    }

    #[test]
    fn every_css_hint_compiles() {
        let selectors = REGISTRY.iter().flat_map(|p| {
            let h = &p.hints;
            h.title
                .iter()
                .chain(h.title_en)
                .chain(h.authors.iter().map(|a| &a.hint))
                .chain(h.genre)
                .chain(h.tags)
                .chain(h.status)
                .chain(h.age_rating)
                .chain(h.chapter_count)
                .chain(h.views)
                .chain(h.provider)
                .chain(h.description)
                .filter_map(|hint| match hint {
                    Hint::Css(sel) => Some(*sel),
                    _ => None,
                })
                .chain(h.episode_item)
                .collect::<Vec<_>>()
        });

        for selector in selectors {
            assert!(dom::compile(selector).is_ok(), "selector does not compile: {selector}");
        }
    }
}
