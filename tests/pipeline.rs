//! End-to-end checks through the public API: raw backend JSON in, chart
//! view out, with the stale-response guard in between.

use std::collections::HashMap;
use std::sync::Mutex;

use pretty_assertions::assert_eq;
use repovista::normalize::normalize_values;
use repovista::pipeline::{PipelineOptions, build_chart};
use repovista::range::{DateRange, StatsRequest, parse_date};
use repovista::rank::DisplayMode;
use repovista::view::RankTier;
use repovista::{
    ChartState, DashboardError, DashboardResult, DashboardState, RepoId, Resolution, StatsSource,
};
use serde_json::{Value, json};

fn scenario() -> Vec<Value> {
    vec![
        json!({
            "author": "a",
            "total_commits": 5,
            "weeks": [
                {"additions": 2, "deletions": 1, "commits": 3},
                {"additions": 3, "deletions": 0, "commits": 2}
            ]
        }),
        json!({
            "author": "b",
            "total_commits": 9,
            "total_additions": 1,
            "total_deletions": 1
        }),
    ]
}

#[test]
fn derived_totals_ranking_and_shares() {
    let stats = normalize_values(scenario());
    let a = stats.iter().find(|s| s.author == "a").unwrap();
    assert_eq!((a.total_additions, a.total_deletions), (5, 1));

    let chart = build_chart(&stats, &PipelineOptions::default());
    let order: Vec<_> = chart.entries.iter().map(|e| e.author.as_str()).collect();
    assert_eq!(order, ["b", "a"]);

    let b = &chart.entries[0];
    assert_eq!(b.rank, 1);
    assert_eq!(b.tier, Some(RankTier::Gold));
    assert!((b.percentage_share - 9.0 / 14.0).abs() < 1e-9);
    assert!((b.percentage_share - 0.643).abs() < 1e-3);

    assert_eq!(chart.summary.total_commits, 14);
    assert_eq!(chart.summary.total_additions, 6);
    assert_eq!(chart.summary.total_deletions, 2);
}

#[test]
fn search_is_case_insensitive_and_order_preserving() {
    let stats = normalize_values(vec![
        json!({"author": "Alice", "total_commits": 1}),
        json!({"author": "bob", "total_commits": 1}),
        json!({"author": "ALICE2", "total_commits": 1}),
    ]);
    let chart = build_chart(&stats, &PipelineOptions::new("ali", DisplayMode::All));
    let order: Vec<_> = chart.entries.iter().map(|e| e.author.as_str()).collect();
    assert_eq!(order, ["Alice", "ALICE2"]);
}

/// Backend stand-in: answers per repository, with an optional failure.
struct FakeBackend {
    responses: HashMap<RepoId, Vec<Value>>,
    seen: Mutex<Vec<StatsRequest>>,
}

impl FakeBackend {
    fn new() -> Self {
        Self {
            responses: HashMap::new(),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn with(mut self, repo: RepoId, values: Vec<Value>) -> Self {
        self.responses.insert(repo, values);
        self
    }
}

impl StatsSource for FakeBackend {
    async fn contributor_stats(&self, request: &StatsRequest) -> DashboardResult<Vec<Value>> {
        self.seen.lock().unwrap().push(request.clone());
        self.responses
            .get(&request.repo)
            .cloned()
            .ok_or_else(|| DashboardError::UpstreamUnavailable {
                endpoint: "/contributors/stats".to_string(),
                reason: "backend returned HTTP 404".to_string(),
            })
    }
}

#[tokio::test]
async fn load_applies_current_generation() {
    let repo = RepoId::new("o", "r");
    let backend = FakeBackend::new().with(repo.clone(), scenario());

    let mut state = DashboardState::new(repo);
    let range = DateRange::new(
        Some(parse_date("2024-01-01").unwrap()),
        Some(parse_date("2024-03-31").unwrap()),
    )
    .unwrap();
    let ticket = state.set_range(range);
    assert_eq!(state.load(&backend, ticket).await, Resolution::Applied);

    let seen = backend.seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    assert!(
        seen[0]
            .query_pairs()
            .contains(&("from_date", "2024-01-01".to_string()))
    );

    let ChartState::Ready(chart) = state.chart() else {
        panic!("expected a ready chart");
    };
    assert_eq!(chart.entries[0].author, "b");
}

#[tokio::test]
async fn late_response_for_previous_repo_is_discarded() {
    let first = RepoId::new("old", "repo");
    let second = RepoId::new("new", "repo");
    let backend = FakeBackend::new()
        .with(first.clone(), vec![json!({"author": "stale", "total_commits": 99})])
        .with(second.clone(), scenario());

    let mut state = DashboardState::new(first);
    let old_ticket = state.refresh();
    let new_ticket = state.set_repo(second);

    // The newer request resolves first, the older one straggles in after.
    let new_result = backend.contributor_stats(new_ticket.request()).await;
    let old_result = backend.contributor_stats(old_ticket.request()).await;
    assert_eq!(state.resolve(new_ticket, new_result), Resolution::Applied);
    let before = state.chart();
    assert_eq!(state.resolve(old_ticket, old_result), Resolution::Stale);

    assert_eq!(state.chart(), before);
    let ChartState::Ready(chart) = before else {
        panic!("expected a ready chart");
    };
    assert!(chart.entries.iter().all(|e| e.author != "stale"));
}

#[tokio::test]
async fn upstream_failure_shows_no_partial_data() {
    let mut state = DashboardState::new(RepoId::new("missing", "repo"));
    let ticket = state.refresh();
    state.load(&FakeBackend::new(), ticket).await;
    assert!(matches!(state.chart(), ChartState::Failed(msg) if msg.contains("404")));
    assert!(state.stats().is_none());
}
