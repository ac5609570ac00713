//! Snapshot regression harness.
//!
//! A run scrapes a fixed URL list and writes, for every URL, a result and a
//! log snapshot into `<out_root>/<stamp>/`:
//!
//! ```text
//! 20260301-120000-comic-naver-com-result.json
//! 20260301-120000-comic-naver-com-logs.txt
//! 20260301-120000-page-kakao-com-error.txt
//! ```
//!
//! Failed scrapes write an `-error.txt` snapshot instead. Snapshot files are
//! write-once. One URL's failure never aborts the batch. [`regression`]
//! compares a run directory against a golden one.

pub mod regression;

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tracing::{info, instrument, warn};

use crate::error::{Error, Result};
use crate::result::ScrapingResult;
use crate::scrape::Scraper;
use crate::url_utils;

/// `strftime` pattern of the 15-character run stamp.
pub const STAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

const STAMP_LEN: usize = 15;

/// Run stamp for a point in time.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use rs_storyscrape::snapshot::stamp;
///
/// let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 5).unwrap();
/// assert_eq!(stamp(at), "20260301-120005");
/// ```
#[must_use]
pub fn stamp(at: DateTime<Utc>) -> String {
    at.format(STAMP_FORMAT).to_string()
}

/// The three snapshot file kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotKind {
    Result,
    Logs,
    Error,
}

impl SnapshotKind {
    const ALL: [Self; 3] = [Self::Result, Self::Logs, Self::Error];

    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Result => "-result.json",
            Self::Logs => "-logs.txt",
            Self::Error => "-error.txt",
        }
    }
}

/// `<stamp>-<domain><suffix>`.
#[must_use]
pub fn file_name(stamp: &str, domain: &str, kind: SnapshotKind) -> String {
    format!("{stamp}-{domain}{}", kind.suffix())
}

/// Split a snapshot file name into stamp, domain key and kind.
#[must_use]
pub fn parse_file_name(name: &str) -> Option<(&str, &str, SnapshotKind)> {
    let (kind, rest) = SnapshotKind::ALL
        .into_iter()
        .find_map(|kind| name.strip_suffix(kind.suffix()).map(|rest| (kind, rest)))?;

    if !rest.is_char_boundary(STAMP_LEN) {
        return None;
    }
    let (stamp, tail) = rest.split_at(STAMP_LEN);
    let domain = tail.strip_prefix('-').filter(|d| !d.is_empty())?;

    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    let well_formed = stamp.as_bytes().get(8) == Some(&b'-') && digits(&stamp[..8]) && digits(&stamp[9..]);
    well_formed.then_some((stamp, domain, kind))
}

/// Create `path` and write `contents`; fails if the file already exists.
pub fn write_once(path: &Path, contents: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| Error::io(path, e))?;
    file.write_all(contents.as_bytes()).map_err(|e| Error::io(path, e))
}

/// Read a result snapshot.
pub fn load_result(path: &Path) -> Result<ScrapingResult> {
    let json = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(serde_json::from_str(&json)?)
}

/// Newest `-result.json` per domain key in `dir`.
pub fn latest_results(dir: &Path) -> Result<BTreeMap<String, PathBuf>> {
    let mut latest: BTreeMap<String, (String, PathBuf)> = BTreeMap::new();

    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        let Some((stamp, domain, SnapshotKind::Result)) = parse_file_name(name) else {
            continue;
        };

        let newer = latest.get(domain).is_none_or(|(seen, _)| stamp > seen.as_str());
        if newer {
            latest.insert(domain.to_string(), (stamp.to_string(), entry.path()));
        }
    }

    Ok(latest.into_iter().map(|(domain, (_, path))| (domain, path)).collect())
}

/// What was written for one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemStatus {
    /// Result and log snapshots written.
    Written,
    /// The scrape failed; an error snapshot was written.
    ScrapeFailed,
    /// Nothing usable could be written.
    Failed(String),
}

/// Per-URL record of a harness run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    pub url: String,
    pub domain: String,
    pub status: ItemStatus,
    pub files: Vec<PathBuf>,
}

impl fmt::Display for ItemReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            ItemStatus::Written => write!(f, "ok      {} ({})", self.domain, self.url),
            ItemStatus::ScrapeFailed => write!(f, "failed  {} ({}): see error snapshot", self.domain, self.url),
            ItemStatus::Failed(reason) => write!(f, "error   {} ({}): {reason}", self.domain, self.url),
        }
    }
}

/// Summary of a harness run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub stamp: String,
    pub dir: PathBuf,
    pub items: Vec<ItemReport>,
}

impl RunReport {
    /// Items that did not produce a result snapshot.
    pub fn failures(&self) -> impl Iterator<Item = &ItemReport> {
        self.items.iter().filter(|i| i.status != ItemStatus::Written)
    }
}

/// Drives a [`Scraper`] over a URL list and persists snapshots.
#[derive(Debug, Clone)]
pub struct Harness {
    scraper: Scraper,
    out_root: PathBuf,
    concurrency: usize,
}

impl Harness {
    /// A sequential harness writing under `out_root`.
    #[must_use]
    pub fn new(scraper: Scraper, out_root: impl Into<PathBuf>) -> Self {
        Self {
            scraper,
            out_root: out_root.into(),
            concurrency: 1,
        }
    }

    /// Scrape up to `n` URLs at once. Snapshots are still written in input
    /// order.
    #[must_use]
    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    /// Run with the current time as stamp.
    pub async fn run<S: AsRef<str> + Sync>(&self, urls: &[S]) -> Result<RunReport> {
        self.run_stamped(&stamp(Utc::now()), urls).await
    }

    /// Run into `<out_root>/<stamp>/`.
    ///
    /// Fails only when the run directory cannot be created; per-URL
    /// problems are recorded in the report.
    #[instrument(skip(self, urls), fields(urls = urls.len(), out = %self.out_root.display()))]
    pub async fn run_stamped<S: AsRef<str> + Sync>(&self, run_stamp: &str, urls: &[S]) -> Result<RunReport> {
        let dir = self.out_root.join(run_stamp);
        fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;

        let mut results = stream::iter(urls.iter().map(|u| u.as_ref()))
            .map(|url| async move { (url, self.scraper.scrape(url).await) })
            .buffered(self.concurrency);

        let mut seen = HashSet::new();
        let mut items = Vec::with_capacity(urls.len());
        while let Some((url, result)) = results.next().await {
            let domain = url_utils::domain_key(url);
            let item = if seen.insert(domain.clone()) {
                persist(&dir, run_stamp, url, &domain, &result)
            } else {
                warn!(url, domain, "duplicate domain key in run");
                ItemReport {
                    url: url.to_string(),
                    domain,
                    status: ItemStatus::Failed("duplicate domain key in this run".to_string()),
                    files: Vec::new(),
                }
            };
            info!(url, status = ?item.status, "snapshot item done");
            items.push(item);
        }

        Ok(RunReport {
            stamp: run_stamp.to_string(),
            dir,
            items,
        })
    }
}

/// Write the snapshots of one URL. Never fails; problems land in the report.
fn persist(dir: &Path, run_stamp: &str, url: &str, domain: &str, result: &ScrapingResult) -> ItemReport {
    let path = |kind| dir.join(file_name(run_stamp, domain, kind));
    let report = |status, files| ItemReport {
        url: url.to_string(),
        domain: domain.to_string(),
        status,
        files,
    };

    if !result.success {
        let reason = result
            .error
            .as_ref()
            .map_or_else(|| "scrape failed".to_string(), |e| format!("{}: {}", e.kind, e.message));
        return write_error(&path(SnapshotKind::Error), &reason, &result.logs)
            .map_or_else(|f| report(f, Vec::new()), |file| report(ItemStatus::ScrapeFailed, vec![file]));
    }

    let written = serde_json::to_string_pretty(result)
        .map_err(Error::from)
        .and_then(|json| write_once(&path(SnapshotKind::Result), &json))
        .and_then(|()| write_once(&path(SnapshotKind::Logs), &result.logs.join("\n")));

    match written {
        Ok(()) => report(
            ItemStatus::Written,
            vec![path(SnapshotKind::Result), path(SnapshotKind::Logs)],
        ),
        Err(err) => {
            warn!(url, error = %err, "writing snapshot failed");
            let reason = format!("snapshot write failed: {err}");
            match write_error(&path(SnapshotKind::Error), &reason, &result.logs) {
                Ok(file) => report(ItemStatus::Failed(reason), vec![file]),
                Err(status) => report(status, Vec::new()),
            }
        }
    }
}

fn write_error(path: &Path, reason: &str, logs: &[String]) -> std::result::Result<PathBuf, ItemStatus> {
    let body = format!("{reason}\n\n{}", logs.join("\n"));
    write_once(path, &body).map(|()| path.to_path_buf()).map_err(|err| {
        warn!(path = %path.display(), error = %err, "writing error snapshot failed");
        ItemStatus::Failed(format!("{reason}; error snapshot not written: {err}"))
    })
}
