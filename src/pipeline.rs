//! Composes the chart stages:
//! normalized stats -> search -> rank -> top-N -> view model.
//!
//! Every function here is pure and synchronous; recomputing after a search or
//! mode change cannot fail.

use serde::Serialize;

use crate::filter;
use crate::model::ContributorStat;
use crate::rank::{self, DisplayMode};
use crate::view::{self, ChartView, Showing, Summary};

/// Local, fetch-free knobs of the chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineOptions {
    pub query: String,
    pub mode: DisplayMode,
}

impl PipelineOptions {
    pub fn new(query: impl Into<String>, mode: DisplayMode) -> Self {
        Self {
            query: query.into(),
            mode,
        }
    }
}

/// Run the chart pipeline over already-normalized stats.
pub fn build_chart(stats: &[ContributorStat], options: &PipelineOptions) -> ChartView {
    let population = rank::rank(stats.to_vec());
    let summary = Summary::of(&population);

    // Filtering the ranked list gives the same order as ranking the filtered
    // one, since the sort is stable.
    let matched = filter::search(&population, &options.query);
    let visible = rank::select(&matched, options.mode);

    ChartView {
        entries: view::build_entries(visible, &population),
        summary,
        showing: Showing {
            mode: options.mode,
            visible: visible.len(),
            matched: matched.len(),
        },
    }
}

/// The short top-contributors list. Ignores the chart's search text.
pub fn top_contributors(stats: &[ContributorStat], n: usize) -> Vec<ContributorStat> {
    let mut ranked = rank::rank(stats.to_vec());
    ranked.truncate(n);
    ranked
}
