use rs_storyscrape::extractor::{self, Extraction, PageContext};
use rs_storyscrape::platform::{CoverTuning, FieldHints, Hint, PlatformProfile};
use rs_storyscrape::{dom, platform, Format, ScrapeLog};
use url::Url;

/// A site profile whose genre selector does not compile.
static BROKEN_GENRE: PlatformProfile = PlatformProfile {
    key: "broken",
    name: "Broken",
    hosts: &["broken.example.org"],
    default_format: Some(Format::Webtoon),
    format_by_path: &[],
    hints: FieldHints {
        title: &[Hint::Css("h1.work-title")],
        title_en: &[],
        authors: &[],
        genre: &[Hint::Css("span[[[")],
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

fn extract(url: &str, html: &str) -> (Extraction, Vec<String>) {
    let url = Url::parse(url).expect("valid url");
    let doc = dom::parse(html);
    let ctx = PageContext::new(&doc, &url, platform::resolve(&url));
    let mut log = ScrapeLog::new();
    let extraction = extractor::extract_all(&ctx, &mut log);
    (extraction, log.into_lines())
}

#[test]
fn naver_series_label_layout() {
    let html = r#"
        <html><head><title>나 혼자만 레벨업 : 네이버 시리즈</title></head>
        <body><div id="content">
            <div class="end_head">
                <h2>나 혼자만 레벨업</h2>
                <span class="ico_finish">완결</span>
            </div>
            <div class="end_info">
                <ul class="info_lst">
                    <li class="ing"><span>완결</span></li>
                    <li><span>장르</span> <a href="/x">판타지</a></li>
                    <li><span>글</span> <a href="/x">추공</a></li>
                    <li><span>그림</span> <a href="/x">장성락</a></li>
                    <li><span>원작</span> <a href="/x">추공</a></li>
                    <li><span>출판사</span> <a href="/x">D&amp;C미디어</a></li>
                    <li><span>이용가</span> <em>15세 이용가</em></li>
                </ul>
            </div>
            <div class="end_dsc"><div class="_synopsis">10여 년 전, 다른 차원과 이쪽 세계를 이어주는 통로 '게이트'가 열리고부터.</div></div>
            <h5 class="end_total_episode">총 <strong>179</strong>화</h5>
        </div></body></html>
    "#;

    let (fields, _) = extract("https://series.naver.com/comic/detail.series?productNo=3063394", html);

    assert_eq!(fields.title.value.as_deref(), Some("나 혼자만 레벨업"));
    assert_eq!(fields.author.value.as_deref(), Some("추공"));
    assert_eq!(fields.illustrator.value.as_deref(), Some("장성락"));
    assert_eq!(fields.original_author.value.as_deref(), Some("추공"));
    assert_eq!(fields.genre.value.as_deref(), Some("판타지"));
    assert_eq!(fields.format.value, Some(Format::Comic));
    assert_eq!(fields.is_completed.value, Some(true));
    assert_eq!(fields.chapter_count.value, Some(179));
    assert_eq!(fields.age_rating.value.as_deref(), Some("15"));
    assert_eq!(fields.content_provider.value.as_deref(), Some("D&C미디어"));
    assert!(fields.description.value.is_some());
}

#[test]
fn naver_series_format_follows_path() {
    let html = r#"<html><body><div class="end_head"><h2>전지적 독자 시점</h2></div></body></html>"#;

    let (novel, _) = extract("https://series.naver.com/novel/detail.series?productNo=3374097", html);
    let (ebook, _) = extract("https://series.naver.com/ebook/detail.series?productNo=1", html);

    assert_eq!(novel.format.value, Some(Format::WebNovel));
    assert_eq!(ebook.format.value, Some(Format::Ebook));
}

#[test]
fn munpia_novel_page() {
    let html = r#"
        <html><body>
        <div class="dd detail-box">
            <a class="cover-box" href="/x"><img src="https://cdn1.munpia.com/files/attach/novel/123456/cover_main.jpg" alt="화산귀환"></a>
            <h2><a href="/x">화산귀환</a></h2>
            <span class="xui-finish">완결</span>
            <dl class="meta-author"><dt>작가</dt><dd class="member-trigger"><strong>비가</strong></dd></dl>
            <p class="meta-path"><strong>무협</strong></p>
            <dl class="meta-etc meta">
                <dt>연재수 :</dt><dd>312 회</dd>
                <dt>조회수 :</dt><dd>1.2억</dd>
            </dl>
        </div>
        <div class="story-box">
            <p class="story">대 화산파 13대 제자. 천하삼대검수 매화검존 청명.</p>
            <div class="tag-list"><a href="/x">#무협</a><a href="/x">#회귀</a></div>
        </div>
        </body></html>
    "#;

    let (fields, _) = extract("https://novel.munpia.com/123456", html);

    assert_eq!(fields.title.value.as_deref(), Some("화산귀환"));
    assert_eq!(fields.author.value.as_deref(), Some("비가"));
    assert_eq!(fields.genre.value.as_deref(), Some("무협"));
    assert_eq!(fields.format.value, Some(Format::WebNovel));
    assert_eq!(fields.is_completed.value, Some(true));
    assert_eq!(fields.chapter_count.value, Some(312));
    assert_eq!(fields.views.value, Some(120_000_000));
    assert_eq!(fields.tags.value, Some(vec!["무협".to_string(), "회귀".to_string()]));
}

#[test]
fn kakao_page_keeps_views_and_chapters_apart() {
    let html = r#"
        <html><body><div class="content-home">
            <span class="font-large3-bold">나 혼자만 레벨업</span>
            <div class="flex">
                <span class="text-el-70 font-small2-bold">총 200화</span>
                <img src="/icons/ico_view.svg" alt="열람자 아이콘"><span class="font-small2-bold text-el-70">13.7만</span>
            </div>
        </div></body></html>
    "#;

    let (fields, _) = extract("https://page.kakao.com/content/59782511", html);

    assert_eq!(fields.chapter_count.value, Some(200));
    assert_eq!(fields.views.value, Some(137_000));
}

#[test]
fn kakao_page_views_alone_are_not_a_chapter_count() {
    let html = r#"
        <html><body>
            <span class="font-large3-bold">나 혼자만 레벨업</span>
            <img src="/icons/ico_view.svg" alt="열람자 아이콘"><span class="font-small2-bold text-el-70">13.7만</span>
        </body></html>
    "#;

    let (fields, _) = extract("https://page.kakao.com/content/59782511", html);

    assert_eq!(fields.views.value, Some(137_000));
    assert_eq!(fields.chapter_count.value, None);
}

#[test]
fn unknown_tokens_stay_absent() {
    let html = r#"
        <html><body><main>
            <h1 class="title">알 수 없는 작품</h1>
            <span class="status">무료</span>
            <span class="age-badge">7세</span>
            <span class="view-count">조회 많음</span>
        </main></body></html>
    "#;

    let (fields, logs) = extract("https://example.org/works/1", html);

    assert_eq!(fields.title.value.as_deref(), Some("알 수 없는 작품"));
    assert_eq!(fields.is_completed.value, None);
    assert_eq!(fields.age_rating.value, None);
    assert_eq!(fields.views.value, None);
    assert!(logs.iter().any(|l| l == "views: not found"));
}

#[test]
fn broken_page_yields_absent_fields_not_errors() {
    let (fields, logs) = extract("https://example.org/x", "<div><p>unclosed <b>tags <i>everywhere");

    assert_eq!(fields.title.value, None);
    assert_eq!(fields.views.value, None);
    assert!(logs.iter().all(|l| !l.contains("extractor failed")));
}

#[test]
fn failing_extractor_leaves_other_fields_intact() {
    let html = r#"<html><body><main>
        <h1 class="work-title">고장난 장르</h1>
        <span class="genre">판타지</span>
        <span class="view-count">조회 5천</span>
    </main></body></html>"#;
    let url = Url::parse("https://broken.example.org/works/1").expect("valid url");
    let doc = dom::parse(html);
    let ctx = PageContext::new(&doc, &url, &BROKEN_GENRE);
    let mut log = ScrapeLog::new();

    let fields = extractor::extract_all(&ctx, &mut log);
    let lines = log.into_lines();

    assert_eq!(fields.genre.value, None);
    assert!(lines.iter().any(|l| l.starts_with("genre: extractor failed")), "{lines:#?}");
    assert_eq!(fields.title.value.as_deref(), Some("고장난 장르"));
    assert_eq!(fields.format.value, Some(Format::Webtoon));
    assert_eq!(fields.views.value, Some(5_000));
}
