//! Ordering and top-N selection.

use std::cmp::Reverse;
use std::fmt;

use serde::Serialize;

use crate::model::ContributorStat;

/// Default N for the contributor chart.
pub const DEFAULT_TOP_N: usize = 15;

/// N for the short "top contributors" list printed beside the chart.
pub const SUMMARY_TOP_N: usize = 5;

/// Sort by `total_commits` descending. Equal counts keep their input order.
pub fn rank(mut stats: Vec<ContributorStat>) -> Vec<ContributorStat> {
    // `sort_by_key` is stable.
    stats.sort_by_key(|s| Reverse(s.total_commits));
    stats
}

/// Which slice of the ranked list is exposed downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "n", rename_all = "lowercase")]
pub enum DisplayMode {
    Top(usize),
    All,
}

impl Default for DisplayMode {
    fn default() -> Self {
        DisplayMode::Top(DEFAULT_TOP_N)
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMode::Top(n) => write!(f, "top {n}"),
            DisplayMode::All => f.write_str("all"),
        }
    }
}

/// Borrow the visible slice of an already-ranked list.
pub fn select(ranked: &[ContributorStat], mode: DisplayMode) -> &[ContributorStat] {
    match mode {
        DisplayMode::Top(n) => &ranked[..n.min(ranked.len())],
        DisplayMode::All => ranked,
    }
}
