//! Shapes the contributor-stats request. Date bounds are calendar dates,
//! inclusive on both ends, and are forwarded to the backend as `YYYY-MM-DD`.
//!
//! No date arithmetic happens here: weekly breakdowns don't line up with
//! arbitrary day boundaries, so range-scoped totals always come from the
//! backend.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{DashboardError, DashboardResult};
use crate::model::RepoId;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Optional inclusive date bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Full history.
    pub const ALL: DateRange = DateRange {
        from: None,
        to: None,
    };

    /// Validate bounds at the input boundary: `from` must not be after `to`.
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> DashboardResult<Self> {
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(DashboardError::InvalidRange { from, to });
            }
        }
        Ok(Self { from, to })
    }

    pub fn is_full_history(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
}

/// A fully-specified stats request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsRequest {
    pub repo: RepoId,
    pub range: DateRange,
}

impl StatsRequest {
    pub fn new(repo: RepoId, range: DateRange) -> Self {
        Self { repo, range }
    }

    /// Query parameters for `GET /contributors/stats`.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("owner", self.repo.owner.clone()),
            ("repo", self.repo.repo.clone()),
        ];
        if let Some(from) = self.range.from {
            pairs.push(("from_date", from.format(DATE_FORMAT).to_string()));
        }
        if let Some(to) = self.range.to {
            pairs.push(("to_date", to.format(DATE_FORMAT).to_string()));
        }
        pairs
    }
}
