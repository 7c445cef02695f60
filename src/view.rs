//! Presentation-ready view model for the contributor chart.
//!
//! Shares are computed against the full unfiltered population while bar
//! widths are relative to the largest visible entry, so narrowing the view
//! with a search never inflates anyone's share.

use serde::Serialize;

use crate::model::ContributorStat;
use crate::rank::DisplayMode;

/// Authors longer than this are truncated in `display_label`.
pub const LABEL_MAX_CHARS: usize = 14;
/// Characters kept before the ellipsis when truncating.
pub const LABEL_KEEP_CHARS: usize = 12;
pub const ELLIPSIS: char = '…';

/// Smallest bar, as a fraction of the track, so zero-commit rows stay visible.
pub const BAR_MIN_FRACTION: f64 = 0.08;
/// Portion of the track that scales with commit count.
pub const BAR_SCALE_FRACTION: f64 = 0.85;

/// Podium marker for the first three visible rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RankTier {
    Gold,
    Silver,
    Bronze,
}

impl RankTier {
    /// Tier for a 1-based visible rank.
    pub fn for_rank(rank: usize) -> Option<Self> {
        match rank {
            1 => Some(Self::Gold),
            2 => Some(Self::Silver),
            3 => Some(Self::Bronze),
            _ => None,
        }
    }

    pub fn medal(self) -> &'static str {
        match self {
            Self::Gold => "🥇",
            Self::Silver => "🥈",
            Self::Bronze => "🥉",
        }
    }
}

/// One row of the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewEntry {
    pub author: String,
    pub total_commits: u64,
    pub total_additions: u64,
    pub total_deletions: u64,
    pub avatar_url: String,
    pub profile_url: String,
    /// 1-based position in the visible slice.
    pub rank: usize,
    pub tier: Option<RankTier>,
    /// Fraction of all commits in the full population, in `[0, 1]`.
    pub percentage_share: f64,
    pub display_label: String,
    /// Bar width as a fraction of the track, in
    /// `[BAR_MIN_FRACTION, BAR_MIN_FRACTION + BAR_SCALE_FRACTION]`.
    pub bar_fraction: f64,
}

/// Scalar totals over the full unfiltered set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub contributors: usize,
    pub total_commits: u64,
    pub total_additions: u64,
    pub total_deletions: u64,
}

impl Summary {
    pub fn of(stats: &[ContributorStat]) -> Self {
        stats.iter().fold(
            Summary {
                contributors: stats.len(),
                ..Default::default()
            },
            |acc, s| Summary {
                total_commits: acc.total_commits.saturating_add(s.total_commits),
                total_additions: acc.total_additions.saturating_add(s.total_additions),
                total_deletions: acc.total_deletions.saturating_add(s.total_deletions),
                ..acc
            },
        )
    }
}

/// What the chart header reports about the visible slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Showing {
    pub mode: DisplayMode,
    pub visible: usize,
    pub matched: usize,
}

/// Everything the renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub entries: Vec<ViewEntry>,
    pub summary: Summary,
    pub showing: Showing,
}

/// `author` if it fits, otherwise the first 12 characters plus an ellipsis.
pub fn display_label(author: &str) -> String {
    if author.chars().count() <= LABEL_MAX_CHARS {
        author.to_string()
    } else {
        let mut label: String = author.chars().take(LABEL_KEEP_CHARS).collect();
        label.push(ELLIPSIS);
        label
    }
}

/// Bar width for `commits` given the largest visible count.
pub fn bar_fraction(commits: u64, visible_max: u64) -> f64 {
    if visible_max == 0 {
        return BAR_MIN_FRACTION;
    }
    let ratio = (commits as f64 / visible_max as f64).clamp(0.0, 1.0);
    BAR_MIN_FRACTION + ratio * BAR_SCALE_FRACTION
}

/// Share of `commits` in a population totalling `population_total`.
pub fn percentage_share(commits: u64, population_total: u64) -> f64 {
    if population_total == 0 {
        0.0
    } else {
        commits as f64 / population_total as f64
    }
}

/// Build view entries for `visible`, measuring shares against `population`.
///
/// `population` is the full ranked set before search and top-N selection.
pub fn build_entries(visible: &[ContributorStat], population: &[ContributorStat]) -> Vec<ViewEntry> {
    let population_total = population
        .iter()
        .fold(0u64, |acc, s| acc.saturating_add(s.total_commits));
    let visible_max = visible.iter().map(|s| s.total_commits).max().unwrap_or(0);

    visible
        .iter()
        .enumerate()
        .map(|(idx, s)| {
            let rank = idx + 1;
            ViewEntry {
                author: s.author.clone(),
                total_commits: s.total_commits,
                total_additions: s.total_additions,
                total_deletions: s.total_deletions,
                avatar_url: s.avatar_url.clone(),
                profile_url: s.profile_url.clone(),
                rank,
                tier: RankTier::for_rank(rank),
                percentage_share: percentage_share(s.total_commits, population_total),
                display_label: display_label(&s.author),
                bar_fraction: bar_fraction(s.total_commits, visible_max),
            }
        })
        .collect()
}
