//! Performance benchmarks for the synchronous extraction pass.
//!
//! Run with: `cargo bench`
//!
//! Benchmarks include:
//! - Field extraction, cover selection and assembly over a synthetic title page
//! - The same pass per platform profile
//! - Saved real-world pages, when present under `../data/title_pages`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rs_storyscrape::extractor::{self, PageContext};
use rs_storyscrape::render::{ImageBox, PageLayout};
use rs_storyscrape::{assemble, cover, dom, magnitude, platform, Options, ScrapeLog, ScrapedTitleData};
use std::fs;
use url::Url;

const SAMPLE_HTML: &str = r#"
<!DOCTYPE html>
<html lang="ko">
<head>
    <meta charset="UTF-8">
    <title>신의 탑 - 네이버 웹툰</title>
    <meta property="og:title" content="신의 탑">
    <meta property="og:description" content="자신의 모든 것이었던 소녀를 쫓아 탑에 들어온 소년">
</head>
<body>
    <header class="gnb"><img src="/img/logo.png" alt="logo"></header>
    <nav><a href="/">홈</a><a href="/webtoon">웹툰</a></nav>
    <main>
        <div class="EpisodeListInfo">
            <div class="thumb"><img src="/thumb/183559/cover.jpg" alt="신의 탑" class="poster"></div>
            <h2 class="title">신의 탑</h2>
            <span class="author">글/그림 SIU</span>
            <span class="genre">판타지</span>
            <span class="age">12세 이용가</span>
            <span class="status">연재중</span>
            <span class="view-count">조회 13.7만</span>
            <div class="tags"><a class="tag">#판타지</a><a class="tag">#탑</a></div>
        </div>
        <ul class="episode-list">
            <li class="episode-item">3화</li>
            <li class="episode-item">2화</li>
            <li class="episode-item">1화</li>
        </ul>
    </main>
    <aside class="recommend">
        <img src="/thumb/1/other.jpg"><img src="/thumb/2/other.jpg">
    </aside>
    <footer><p>© NAVER WEBTOON</p></footer>
</body>
</html>
"#;

fn layout() -> PageLayout {
    PageLayout {
        images: vec![
            ImageBox::new(120.0, 30.0, 10.0),
            ImageBox::new(240.0, 320.0, 180.0),
            ImageBox::new(200.0, 200.0, 2200.0),
            ImageBox::new(200.0, 200.0, 2200.0),
        ],
        viewport_height: Some(900.0),
    }
}

fn extract_pass(html: &str, url: &Url, layout: &PageLayout, options: &Options) -> Option<ScrapedTitleData> {
    let mut log = ScrapeLog::new();
    let profile = platform::resolve(url);
    let doc = dom::parse(html);
    let ctx = PageContext::new(&doc, url, profile);
    let extraction = extractor::extract_all(&ctx, &mut log);
    let cover = cover::select_cover(&doc, url, layout, profile, options, &mut log);
    assemble::title_data(extraction, cover)
}

fn bench_extract_pass(c: &mut Criterion) {
    let url = Url::parse("https://comic.naver.com/webtoon/list?titleId=183559").expect("valid url");
    let options = Options::default();
    let layout = layout();

    c.bench_function("extract_pass", |b| {
        b.iter(|| extract_pass(black_box(SAMPLE_HTML), &url, &layout, &options));
    });
}

fn bench_per_platform(c: &mut Criterion) {
    let options = Options::default();
    let layout = layout();
    let mut group = c.benchmark_group("per_platform");

    for profile in platform::REGISTRY {
        let Some(host) = profile.hosts.first() else {
            continue;
        };
        let Ok(url) = Url::parse(&format!("https://{host}/title/1")) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::new("extract_pass", profile.key), &url, |b, url| {
            b.iter(|| extract_pass(black_box(SAMPLE_HTML), url, &layout, &options));
        });
    }

    group.finish();
}

fn bench_magnitude(c: &mut Criterion) {
    let inputs = ["13.7만", "1.2억", "5천", "1,234,567", "3.4M", "not a number"];
    c.bench_function("magnitude_parse", |b| {
        b.iter(|| inputs.iter().map(|s| magnitude::parse(black_box(s))).count());
    });
}

/// Benchmark with saved title pages of varying sizes
fn bench_real_world_html(c: &mut Criterion) {
    let html_dir = "../data/title_pages";
    let sample_files = [
        ("comic.naver.com", "naver_webtoon.html"),
        ("page.kakao.com", "kakao_page.html"),
        ("ridibooks.com", "ridi.html"),
    ];
    let options = Options::default();
    let layout = PageLayout::unmeasured();

    let mut group = c.benchmark_group("real_world");

    for (host, filename) in &sample_files {
        let path = format!("{html_dir}/{filename}");
        let (Ok(html), Ok(url)) = (fs::read_to_string(&path), Url::parse(&format!("https://{host}/"))) else {
            continue;
        };
        let size_kb = html.len() / 1024;
        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("extract_pass", format!("{filename} ({size_kb}KB)")),
            &html,
            |b, html| {
                b.iter(|| extract_pass(black_box(html), &url, &layout, &options));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_extract_pass,
    bench_per_platform,
    bench_magnitude,
    bench_real_world_html
);
criterion_main!(benches);
