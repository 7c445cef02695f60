//! Contributor statistics for GitHub repositories.
//!
//! Raw per-contributor records from the analyzer backend are normalized,
//! searched, ranked, cut down to the top N and turned into a chart view
//! model ready for rendering.
//!
//! # Modules
//!
//! - [`model`] - Repository identity, raw and normalized records
//! - [`normalize`] - Derived totals and record validation
//! - [`filter`] - Case-insensitive author search
//! - [`range`] - Date-range request shaping
//! - [`rank`] - Ordering and top-N selection
//! - [`view`] - Shares, tiers, bar widths and labels
//! - [`pipeline`] - The stages composed
//! - [`session`] - Dashboard state and stale-response guard
//! - [`client`] - HTTP backend client
//! - [`languages`] - Language composition
//! - [`security`] - Dependabot alerts
//! - [`svg`] - SVG chart card
//! - [`config`] - Configuration loading
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```
//! use repovista::pipeline::{PipelineOptions, build_chart};
//! use repovista::normalize::normalize_values;
//! use serde_json::json;
//!
//! let stats = normalize_values(vec![
//!     json!({"author": "a", "total_commits": 5}),
//!     json!({"author": "b", "total_commits": 9}),
//! ]);
//! let chart = build_chart(&stats, &PipelineOptions::default());
//! assert_eq!(chart.entries[0].author, "b");
//! ```
#![deny(unsafe_code)]

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod languages;
pub mod model;
pub mod normalize;
pub mod observability;
pub mod pipeline;
pub mod range;
pub mod rank;
pub mod security;
pub mod session;
pub mod svg;
pub mod view;

pub use config::{Config, ConfigLoader};
pub use error::{DashboardError, DashboardResult, MalformedRecord};
pub use model::{ContributorStat, RawContributorStat, RepoId, RepoInfo, WeekStat};
pub use security::{SecurityAlert, SecuritySummary, Severity};
pub use session::{ChartState, DashboardState, FetchTicket, Resolution, StatsSource};
