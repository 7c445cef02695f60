//! Dashboard state and the stale-response guard.
//!
//! Every trigger that needs new data (repository, date range, explicit
//! refresh) bumps a generation counter and hands out a [`FetchTicket`].
//! Only a response carrying the current generation is accepted; anything
//! older is discarded on arrival. In-flight requests are never aborted.
//!
//! Search text and display mode are local: changing them re-runs the
//! pipeline over the accepted data without fetching.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::DashboardResult;
use crate::model::{ContributorStat, RepoId};
use crate::normalize;
use crate::pipeline::{self, PipelineOptions};
use crate::range::{DateRange, StatsRequest};
use crate::rank::DisplayMode;
use crate::view::ChartView;

/// Anything that can answer a contributor-stats request with raw records.
pub trait StatsSource {
    fn contributor_stats(
        &self,
        request: &StatsRequest,
    ) -> impl Future<Output = DashboardResult<Vec<Value>>> + Send;
}

/// Proof of which trigger a fetch belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    request: StatsRequest,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn request(&self) -> &StatsRequest {
        &self.request
    }
}

/// Outcome of handing a response back to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    Stale,
}

#[derive(Debug, Clone)]
enum Slot {
    Idle,
    Pending,
    Loaded(Vec<ContributorStat>),
    Failed(String),
}

/// What the presentation layer should show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "lowercase")]
pub enum ChartState {
    Idle,
    Loading,
    /// The fetch failed; no partial data is shown.
    Failed(String),
    /// The fetch succeeded but no usable contributor came back.
    Empty,
    Ready(ChartView),
}

/// Owned dashboard state, threaded explicitly through each trigger.
#[derive(Debug, Clone)]
pub struct DashboardState {
    repo: RepoId,
    range: DateRange,
    options: PipelineOptions,
    generation: u64,
    slot: Slot,
}

impl DashboardState {
    pub fn new(repo: RepoId) -> Self {
        Self {
            repo,
            range: DateRange::ALL,
            options: PipelineOptions::default(),
            generation: 0,
            slot: Slot::Idle,
        }
    }

    pub fn repo(&self) -> &RepoId {
        &self.repo
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.options.query = query.into();
    }

    pub fn set_mode(&mut self, mode: DisplayMode) {
        self.options.mode = mode;
    }

    /// Switch repository; invalidates anything in flight.
    pub fn set_repo(&mut self, repo: RepoId) -> FetchTicket {
        self.repo = repo;
        self.begin_fetch()
    }

    /// Change the date range; invalidates anything in flight.
    pub fn set_range(&mut self, range: DateRange) -> FetchTicket {
        self.range = range;
        self.begin_fetch()
    }

    /// Re-fetch the current repository and range.
    pub fn refresh(&mut self) -> FetchTicket {
        self.begin_fetch()
    }

    fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.slot = Slot::Pending;
        debug!(generation = self.generation, repo = %self.repo, "fetch started");
        FetchTicket {
            generation: self.generation,
            request: StatsRequest::new(self.repo.clone(), self.range),
        }
    }

    /// Accept a response if it belongs to the most recent trigger.
    pub fn resolve(
        &mut self,
        ticket: FetchTicket,
        result: DashboardResult<Vec<Value>>,
    ) -> Resolution {
        if ticket.generation != self.generation {
            debug!(
                stale = ticket.generation,
                current = self.generation,
                "discarding stale response"
            );
            return Resolution::Stale;
        }

        self.slot = match result {
            Ok(values) => {
                let received = values.len();
                let stats = normalize::normalize_values(values);
                info!(
                    generation = ticket.generation,
                    received,
                    kept = stats.len(),
                    "contributor stats accepted"
                );
                Slot::Loaded(stats)
            }
            Err(e) => {
                warn!(generation = ticket.generation, error = %e, "contributor stats fetch failed");
                Slot::Failed(e.to_string())
            }
        };
        Resolution::Applied
    }

    /// Normalized stats from the accepted response, if any.
    pub fn stats(&self) -> Option<&[ContributorStat]> {
        match &self.slot {
            Slot::Loaded(stats) => Some(stats),
            _ => None,
        }
    }

    /// Run the pipeline over the accepted data with the current options.
    pub fn chart(&self) -> ChartState {
        match &self.slot {
            Slot::Idle => ChartState::Idle,
            Slot::Pending => ChartState::Loading,
            Slot::Failed(msg) => ChartState::Failed(msg.clone()),
            Slot::Loaded(stats) if stats.is_empty() => ChartState::Empty,
            Slot::Loaded(stats) => ChartState::Ready(pipeline::build_chart(stats, &self.options)),
        }
    }

    /// Fetch with the given ticket's request and resolve it.
    ///
    /// This is the sequential path: the state stays borrowed until the fetch
    /// completes, so no other trigger can fire in between. Callers that let
    /// triggers overlap take tickets up front, run
    /// [`StatsSource::contributor_stats`] themselves and hand each result to
    /// [`resolve`](Self::resolve) as it arrives.
    pub async fn load<S: StatsSource>(&mut self, source: &S, ticket: FetchTicket) -> Resolution {
        let result = source.contributor_stats(ticket.request()).await;
        self.resolve(ticket, result)
    }
}
