//! Error types for repovista.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors surfaced at the boundary between the pipeline and its callers.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The backend could not be reached, answered with a non-success status,
    /// or returned a body that is not the expected shape.
    #[error("upstream unavailable ({endpoint}): {reason}")]
    UpstreamUnavailable {
        /// Endpoint path that failed, e.g. `/contributors/stats`.
        endpoint: String,
        /// Human-readable failure description.
        reason: String,
    },

    /// The repository identifier is not in `owner/repo` form.
    #[error("invalid repository '{0}': expected owner/repo, e.g. vercel/next.js")]
    InvalidRepoId(String),

    /// The requested date range starts after it ends.
    #[error("invalid date range: {from} is after {to}")]
    InvalidRange {
        /// Inclusive start.
        from: NaiveDate,
        /// Inclusive end.
        to: NaiveDate,
    },

    /// Failed to load configuration.
    #[error("invalid configuration: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl DashboardError {
    pub(crate) fn upstream(endpoint: &str, reason: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            endpoint: endpoint.to_string(),
            reason: reason.into(),
        }
    }
}

/// A raw upstream record that cannot be keyed or displayed.
///
/// Never fatal: the normalizer drops the record and moves on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed contributor record at index {index}: {reason}")]
pub struct MalformedRecord {
    /// Position of the record in the upstream array.
    pub index: usize,
    /// Why the record was rejected.
    pub reason: String,
}

/// Result type alias using [`DashboardError`].
pub type DashboardResult<T> = Result<T, DashboardError>;
