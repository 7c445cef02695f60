//! Fills in derived totals and turns raw upstream records into
//! [`ContributorStat`]s.
//!
//! For each of additions, deletions and commits:
//! 1. an explicit upstream value wins;
//! 2. otherwise the sum over `weeks` (missing per-week values count as 0);
//! 3. otherwise 0.
//!
//! Records whose `author` is missing, empty or not a string are dropped,
//! never defaulted. Any other author string is kept verbatim, whitespace
//! included. A repeated author keeps its first occurrence; later copies are
//! dropped and logged at debug like any other malformed record.

use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use crate::error::MalformedRecord;
use crate::model::{
    ContributorStat, RawContributorStat, WeekStat, avatar_url_for, profile_url_for,
};

/// Sums over a weekly breakdown.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyTotals {
    pub additions: u64,
    pub deletions: u64,
    pub commits: u64,
}

pub fn sum_weeks(weeks: &[WeekStat]) -> WeeklyTotals {
    weeks.iter().fold(WeeklyTotals::default(), |acc, w| WeeklyTotals {
        additions: acc.additions.saturating_add(w.additions.unwrap_or(0)),
        deletions: acc.deletions.saturating_add(w.deletions.unwrap_or(0)),
        commits: acc.commits.saturating_add(w.commits.unwrap_or(0)),
    })
}

/// Normalize a single raw record.
pub fn normalize_record(
    index: usize,
    raw: RawContributorStat,
) -> Result<ContributorStat, MalformedRecord> {
    let author = match raw.author {
        Some(a) if !a.is_empty() => a,
        Some(_) => {
            return Err(MalformedRecord {
                index,
                reason: "author is empty".to_string(),
            });
        }
        None => {
            return Err(MalformedRecord {
                index,
                reason: "author is missing".to_string(),
            });
        }
    };

    let weekly = raw.weeks.as_deref().map(sum_weeks).unwrap_or_default();

    Ok(ContributorStat {
        total_commits: raw.total_commits.unwrap_or(weekly.commits),
        total_additions: raw.total_additions.unwrap_or(weekly.additions),
        total_deletions: raw.total_deletions.unwrap_or(weekly.deletions),
        avatar_url: raw.avatar_url.unwrap_or_else(|| avatar_url_for(&author)),
        profile_url: raw
            .profile_url
            .or(raw.html_url)
            .unwrap_or_else(|| profile_url_for(&author)),
        weeks: raw.weeks,
        author,
    })
}

/// Normalize already-decoded records, dropping malformed ones and keeping the
/// first occurrence of any repeated author.
pub fn normalize(records: Vec<RawContributorStat>) -> Vec<ContributorStat> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(records.len());

    for (index, raw) in records.into_iter().enumerate() {
        match normalize_record(index, raw) {
            Ok(stat) => {
                if seen.insert(stat.author.clone()) {
                    out.push(stat);
                } else {
                    let e = MalformedRecord {
                        index,
                        reason: format!("duplicate author {:?}", stat.author),
                    };
                    debug!(%e, "dropping contributor record");
                }
            }
            Err(e) => debug!(%e, "dropping contributor record"),
        }
    }

    out
}

/// Decode and normalize an upstream JSON array element by element.
///
/// Elements that are not objects are treated like records without an author.
pub fn normalize_values(values: Vec<Value>) -> Vec<ContributorStat> {
    let raws = values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value::<RawContributorStat>(value).unwrap_or_else(|e| {
                debug!(index, error = %e, "contributor record is not an object");
                RawContributorStat::default()
            })
        })
        .collect();
    normalize(raws)
}
