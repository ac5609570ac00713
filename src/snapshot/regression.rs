//! Golden-vs-current snapshot comparison.
//!
//! Each result snapshot is reduced to a [`Summary`] of five fields. Pairs of
//! summaries with the same domain key are diffed field by field; a
//! difference in a must-match field (see [`RegressionOptions`]) or a golden
//! domain with no current snapshot is a regression. Other differences are
//! reported as advisory.

use std::collections::BTreeMap;
use std::fmt::{self, Write as _};
use std::path::Path;
use std::str::FromStr;

use crate::error::Result;
use crate::options::RegressionOptions;
use crate::result::ScrapingResult;

use super::{latest_results, load_result};

/// A field of the regression summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SummaryField {
    Title,
    Image,
    Format,
    /// Writer, illustrator and original-author credits together.
    Authorship,
    Genre,
}

impl SummaryField {
    pub const ALL: [Self; 5] = [Self::Title, Self::Image, Self::Format, Self::Authorship, Self::Genre];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Image => "image",
            Self::Format => "format",
            Self::Authorship => "authorship",
            Self::Genre => "genre",
        }
    }
}

impl fmt::Display for SummaryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown summary field '{s}' (expected title, image, format, authorship or genre)"))
    }
}

/// The comparable projection of one result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub title: Option<String>,
    pub image: Option<String>,
    pub format: Option<String>,
    pub authorship: Option<String>,
    pub genre: Option<String>,
}

impl Summary {
    /// Summarize a result. Failed results summarize to all-absent.
    #[must_use]
    pub fn of(result: &ScrapingResult) -> Self {
        let Some(data) = result.data.as_ref() else {
            return Self::default();
        };

        let credits: Vec<&str> = [&data.author, &data.illustrator, &data.original_author]
            .into_iter()
            .filter_map(|credit| credit.as_deref())
            .collect();

        Self {
            title: Some(data.title_name_kr.clone()).filter(|t| !t.is_empty()),
            image: data.title_image.clone(),
            format: data.format.map(|f| f.as_str().to_string()),
            authorship: (!credits.is_empty()).then(|| credits.join(" / ")),
            genre: data.genre.clone(),
        }
    }

    #[must_use]
    pub fn get(&self, field: SummaryField) -> Option<&str> {
        match field {
            SummaryField::Title => self.title.as_deref(),
            SummaryField::Image => self.image.as_deref(),
            SummaryField::Format => self.format.as_deref(),
            SummaryField::Authorship => self.authorship.as_deref(),
            SummaryField::Genre => self.genre.as_deref(),
        }
    }
}

/// One field that differs between golden and current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDiff {
    pub field: SummaryField,
    pub golden: Option<String>,
    pub current: Option<String>,
    pub must_match: bool,
}

impl fmt::Display for FieldDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |v: &Option<String>| v.as_ref().map_or_else(|| "(absent)".to_string(), |s| format!("{s:?}"));
        write!(f, "{}: {} -> {}", self.field, show(&self.golden), show(&self.current))
    }
}

/// Field differences for one domain key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegressionDiff {
    pub domain: String,
    pub diffs: Vec<FieldDiff>,
}

impl RegressionDiff {
    /// Diff two summaries over every summary field.
    #[must_use]
    pub fn between(domain: &str, golden: &Summary, current: &Summary, options: &RegressionOptions) -> Self {
        let diffs = SummaryField::ALL
            .into_iter()
            .filter(|field| golden.get(*field) != current.get(*field))
            .map(|field| FieldDiff {
                field,
                golden: golden.get(field).map(str::to_string),
                current: current.get(field).map(str::to_string),
                must_match: options.is_must_match(field),
            })
            .collect();

        Self {
            domain: domain.to_string(),
            diffs,
        }
    }

    pub fn must_match(&self) -> impl Iterator<Item = &FieldDiff> {
        self.diffs.iter().filter(|d| d.must_match)
    }

    pub fn advisory(&self) -> impl Iterator<Item = &FieldDiff> {
        self.diffs.iter().filter(|d| !d.must_match)
    }

    #[must_use]
    pub fn is_regression(&self) -> bool {
        self.must_match().next().is_some()
    }
}

/// Outcome for one domain key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainOutcome {
    /// Present in both; possibly with advisory differences.
    Compared(RegressionDiff),
    /// In golden, absent from current.
    Missing(String),
    /// In current only. Informational.
    Added(String),
}

impl DomainOutcome {
    #[must_use]
    pub fn domain(&self) -> &str {
        match self {
            Self::Compared(diff) => &diff.domain,
            Self::Missing(domain) | Self::Added(domain) => domain,
        }
    }

    #[must_use]
    pub fn is_regression(&self) -> bool {
        match self {
            Self::Compared(diff) => diff.is_regression(),
            Self::Missing(_) => true,
            Self::Added(_) => false,
        }
    }
}

/// Result of comparing a current run against golden snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonReport {
    pub outcomes: Vec<DomainOutcome>,
}

impl ComparisonReport {
    #[must_use]
    pub fn has_regression(&self) -> bool {
        self.outcomes.iter().any(DomainOutcome::is_regression)
    }

    #[must_use]
    pub fn regressions(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_regression()).count()
    }

    /// One line per domain, followed by indented field lines.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for outcome in &self.outcomes {
            match outcome {
                DomainOutcome::Compared(diff) if diff.is_regression() => {
                    let _ = writeln!(out, "REGRESSION {}", diff.domain);
                    for d in diff.must_match() {
                        let _ = writeln!(out, "    must-match {d}");
                    }
                    for d in diff.advisory() {
                        let _ = writeln!(out, "    advisory   {d}");
                    }
                }
                DomainOutcome::Compared(diff) => {
                    let _ = writeln!(out, "OK         {}", diff.domain);
                    for d in diff.advisory() {
                        let _ = writeln!(out, "    advisory   {d}");
                    }
                }
                DomainOutcome::Missing(domain) => {
                    let _ = writeln!(out, "REGRESSION {domain}");
                    let _ = writeln!(out, "    missing from current run");
                }
                DomainOutcome::Added(domain) => {
                    let _ = writeln!(out, "NEW        {domain}");
                }
            }
        }
        let _ = write!(
            out,
            "{} domain(s) compared, {} regression(s)",
            self.outcomes.len(),
            self.regressions()
        );
        out
    }
}

/// Compare summaries keyed by domain.
#[must_use]
pub fn compare(
    golden: &BTreeMap<String, Summary>,
    current: &BTreeMap<String, Summary>,
    options: &RegressionOptions,
) -> ComparisonReport {
    let mut outcomes: Vec<DomainOutcome> = golden
        .iter()
        .map(|(domain, expected)| match current.get(domain) {
            Some(actual) => DomainOutcome::Compared(RegressionDiff::between(domain, expected, actual, options)),
            None => DomainOutcome::Missing(domain.clone()),
        })
        .collect();

    outcomes.extend(
        current
            .keys()
            .filter(|domain| !golden.contains_key(*domain))
            .map(|domain| DomainOutcome::Added(domain.clone())),
    );

    ComparisonReport { outcomes }
}

/// Load the newest result snapshot per domain in `dir` and summarize it.
pub fn load_summaries(dir: &Path) -> Result<BTreeMap<String, Summary>> {
    latest_results(dir)?
        .into_iter()
        .map(|(domain, path)| -> Result<(String, Summary)> { Ok((domain, Summary::of(&load_result(&path)?))) })
        .collect()
}

/// Compare two snapshot directories.
pub fn compare_dirs(golden: &Path, current: &Path, options: &RegressionOptions) -> Result<ComparisonReport> {
    let golden = load_summaries(golden)?;
    let current = load_summaries(current)?;
    Ok(compare(&golden, &current, options))
}
