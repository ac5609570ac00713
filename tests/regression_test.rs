//! Snapshot harness and golden comparison, end to end on a temp directory.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use rs_storyscrape::render::FixtureRenderer;
use rs_storyscrape::snapshot::regression::{compare_dirs, DomainOutcome, SummaryField};
use rs_storyscrape::snapshot::{self, Harness, ItemStatus, SnapshotKind};
use rs_storyscrape::{Options, RegressionOptions, Scraper};

const GOLDEN_STAMP: &str = "20260301-120000";
const CURRENT_STAMP: &str = "20260302-120000";

fn page(title: &str, genre: &str) -> String {
    format!(
        r#"<html><head><title>{title}</title></head><body><main>
            <h1 class="title">{title}</h1>
            <span class="author">글 홍길동 / 그림 김철수</span>
            <span class="genre">{genre}</span>
            <div class="cover"><img src="/covers/1.jpg" alt="cover" width="240" height="340"></div>
        </main></body></html>"#
    )
}

fn harness(renderer: FixtureRenderer, root: &Path) -> Harness {
    Harness::new(Scraper::new(Arc::new(renderer), Options::default()), root)
}

async fn golden_run(root: &Path) {
    let renderer = FixtureRenderer::new()
        .with_page("https://alpha.example.org/t/1", page("Alpha", "판타지"))
        .with_page("https://beta.example.org/t/1", page("베타", "로맨스"));
    let report = harness(renderer, root)
        .run_stamped(GOLDEN_STAMP, &["https://alpha.example.org/t/1", "https://beta.example.org/t/1"])
        .await
        .expect("golden run");
    assert!(report.failures().next().is_none(), "{:?}", report.items);
}

#[tokio::test]
async fn run_writes_result_and_log_snapshots() {
    let tmp = tempfile::tempdir().expect("tempdir");
    golden_run(tmp.path()).await;

    let dir = tmp.path().join(GOLDEN_STAMP);
    for domain in ["alpha-example-org", "beta-example-org"] {
        let result = dir.join(snapshot::file_name(GOLDEN_STAMP, domain, SnapshotKind::Result));
        let logs = dir.join(snapshot::file_name(GOLDEN_STAMP, domain, SnapshotKind::Logs));
        assert!(result.is_file(), "{}", result.display());
        assert!(logs.is_file(), "{}", logs.display());

        let loaded = snapshot::load_result(&result).expect("result snapshot parses");
        assert!(loaded.success);
        assert_eq!(fs::read_to_string(&logs).expect("logs readable"), loaded.logs.join("\n"));
    }
}

#[tokio::test]
async fn failed_scrape_writes_only_error_snapshot() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let renderer = FixtureRenderer::new().failing("https://down.example.org/t/1", "connection refused");

    let report = harness(renderer, tmp.path())
        .run_stamped(GOLDEN_STAMP, &["https://down.example.org/t/1"])
        .await
        .expect("run");

    assert_eq!(report.items[0].status, ItemStatus::ScrapeFailed);
    let dir = tmp.path().join(GOLDEN_STAMP);
    let error = dir.join(snapshot::file_name(GOLDEN_STAMP, "down-example-org", SnapshotKind::Error));
    let body = fs::read_to_string(&error).expect("error snapshot");
    assert!(body.starts_with("render: "));
    assert!(body.contains("connection refused"));
    assert!(!dir
        .join(snapshot::file_name(GOLDEN_STAMP, "down-example-org", SnapshotKind::Result))
        .exists());
}

#[tokio::test]
async fn second_url_for_same_domain_is_not_overwritten() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let renderer = FixtureRenderer::new().serving_any(page("Alpha", "판타지"));

    let report = harness(renderer, tmp.path())
        .run_stamped(GOLDEN_STAMP, &["https://alpha.example.org/t/1", "https://www.alpha.example.org/t/2"])
        .await
        .expect("run");

    assert_eq!(report.items[0].status, ItemStatus::Written);
    assert!(matches!(report.items[1].status, ItemStatus::Failed(_)));
    assert_eq!(report.failures().count(), 1);
}

#[tokio::test]
async fn failed_result_write_falls_back_to_error_snapshot() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let dir = tmp.path().join(GOLDEN_STAMP);
    fs::create_dir_all(&dir).expect("run dir");
    let taken = dir.join(snapshot::file_name(GOLDEN_STAMP, "alpha-example-org", SnapshotKind::Result));
    fs::write(&taken, "left over").expect("pre-existing file");

    let renderer = FixtureRenderer::new()
        .with_page("https://alpha.example.org/t/1", page("Alpha", "판타지"))
        .with_page("https://beta.example.org/t/1", page("베타", "로맨스"));
    let report = harness(renderer, tmp.path())
        .run_stamped(GOLDEN_STAMP, &["https://alpha.example.org/t/1", "https://beta.example.org/t/1"])
        .await
        .expect("run");

    assert!(matches!(&report.items[0].status, ItemStatus::Failed(reason) if reason.starts_with("snapshot write failed")));
    assert_eq!(fs::read_to_string(&taken).expect("readable"), "left over");
    let error = dir.join(snapshot::file_name(GOLDEN_STAMP, "alpha-example-org", SnapshotKind::Error));
    let body = fs::read_to_string(&error).expect("error snapshot");
    assert!(body.starts_with("snapshot write failed"));

    assert_eq!(report.items[1].status, ItemStatus::Written);
    assert!(dir
        .join(snapshot::file_name(GOLDEN_STAMP, "beta-example-org", SnapshotKind::Result))
        .is_file());
}

#[tokio::test]
async fn changed_title_is_a_regression() {
    let tmp = tempfile::tempdir().expect("tempdir");
    golden_run(tmp.path()).await;

    let renderer = FixtureRenderer::new()
        .with_page("https://alpha.example.org/t/1", page("Beta", "판타지"))
        .with_page("https://beta.example.org/t/1", page("베타", "로맨스"));
    harness(renderer, tmp.path())
        .run_stamped(CURRENT_STAMP, &["https://alpha.example.org/t/1", "https://beta.example.org/t/1"])
        .await
        .expect("current run");

    let report = compare_dirs(
        &tmp.path().join(GOLDEN_STAMP),
        &tmp.path().join(CURRENT_STAMP),
        &RegressionOptions::default(),
    )
    .expect("compare");

    assert!(report.has_regression());
    assert_eq!(report.regressions(), 1);
    let rendered = report.render();
    assert!(rendered.contains("REGRESSION alpha-example-org"));
    assert!(rendered.contains(r#"must-match title: "Alpha" -> "Beta""#));
    assert!(rendered.contains("OK         beta-example-org"));
}

#[tokio::test]
async fn changed_genre_is_advisory_only() {
    let tmp = tempfile::tempdir().expect("tempdir");
    golden_run(tmp.path()).await;

    let renderer = FixtureRenderer::new()
        .with_page("https://alpha.example.org/t/1", page("Alpha", "무협"))
        .with_page("https://beta.example.org/t/1", page("베타", "로맨스"));
    harness(renderer, tmp.path())
        .run_stamped(CURRENT_STAMP, &["https://alpha.example.org/t/1", "https://beta.example.org/t/1"])
        .await
        .expect("current run");

    let report = compare_dirs(
        &tmp.path().join(GOLDEN_STAMP),
        &tmp.path().join(CURRENT_STAMP),
        &RegressionOptions::default(),
    )
    .expect("compare");

    assert!(!report.has_regression());
    assert!(report.render().contains(r#"advisory   genre: "판타지" -> "무협""#));

    let strict = RegressionOptions {
        must_match: vec![SummaryField::Title, SummaryField::Genre],
    };
    let report = compare_dirs(&tmp.path().join(GOLDEN_STAMP), &tmp.path().join(CURRENT_STAMP), &strict)
        .expect("compare");
    assert!(report.has_regression());
}

#[tokio::test]
async fn domain_failing_in_current_run_is_missing() {
    let tmp = tempfile::tempdir().expect("tempdir");
    golden_run(tmp.path()).await;

    let renderer = FixtureRenderer::new()
        .with_page("https://alpha.example.org/t/1", page("Alpha", "판타지"))
        .failing("https://beta.example.org/t/1", "503 Service Unavailable")
        .with_page("https://gamma.example.org/t/1", page("감마", "드라마"));
    harness(renderer, tmp.path())
        .run_stamped(
            CURRENT_STAMP,
            &[
                "https://alpha.example.org/t/1",
                "https://beta.example.org/t/1",
                "https://gamma.example.org/t/1",
            ],
        )
        .await
        .expect("current run");

    let report = compare_dirs(
        &tmp.path().join(GOLDEN_STAMP),
        &tmp.path().join(CURRENT_STAMP),
        &RegressionOptions::default(),
    )
    .expect("compare");

    assert!(report.has_regression());
    assert!(report
        .outcomes
        .contains(&DomainOutcome::Missing("beta-example-org".to_string())));
    assert!(report
        .outcomes
        .contains(&DomainOutcome::Added("gamma-example-org".to_string())));
    assert!(report.render().ends_with("3 domain(s) compared, 1 regression(s)"));
}

#[test]
fn comparing_missing_directory_is_an_error() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let result = compare_dirs(
        &tmp.path().join("nope"),
        tmp.path(),
        &RegressionOptions::default(),
    );
    assert!(result.is_err());
}
