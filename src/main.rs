use std::fs;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde_json::json;
use tracing::{debug, warn};

use repovista::cli::Cli;
use repovista::client::BackendClient;
use repovista::languages::{self, format_bytes};
use repovista::observability;
use repovista::pipeline;
use repovista::range::DateRange;
use repovista::rank::{DisplayMode, SUMMARY_TOP_N};
use repovista::svg;
use repovista::{
    ChartState, ConfigLoader, ContributorStat, DashboardState, RepoId, SecurityAlert,
    SecuritySummary,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let mut loader = ConfigLoader::new().with_search_dir(&cwd);
    if let Some(ref path) = cli.config {
        loader = loader.with_file(path);
    }
    let config = loader.load().context("failed to load configuration")?;

    observability::init(observability::env_filter(
        cli.quiet,
        cli.verbose,
        config.log_level.as_str(),
    ))
    .context("failed to initialize logging")?;

    let repo: RepoId = cli.repo.parse()?;
    let range = DateRange::new(cli.from, cli.to)?;
    let mode = match (cli.all, cli.top) {
        (true, _) => DisplayMode::All,
        (false, Some(n)) => DisplayMode::Top(usize::try_from(n).unwrap_or(usize::MAX)),
        (false, None) => DisplayMode::Top(config.top_n),
    };
    let theme = cli.theme.unwrap_or(config.theme);
    debug!(%repo, ?range, %mode, ?theme, base_url = %config.base_url, "starting");

    let client = BackendClient::new(&config.base_url, &config.user_agent);

    let mut state = DashboardState::new(repo.clone());
    state.set_query(cli.search.as_str());
    state.set_mode(mode);
    let ticket = state.set_range(range);

    // Summary cards are best-effort; only the stats fetch is fatal.
    let (info, langs, alerts, _) = tokio::join!(
        client.repo_info(&repo),
        client.languages(&repo),
        client.security_alerts(&repo),
        state.load(&client, ticket),
    );
    let info = info
        .inspect_err(|e| warn!(error = %e, "repository info unavailable"))
        .ok();
    let langs = langs
        .map(|l| languages::language_breakdown(&l))
        .inspect_err(|e| warn!(error = %e, "language data unavailable"))
        .unwrap_or_default();
    let alerts = alerts
        .inspect_err(|e| warn!(error = %e, "security alerts unavailable"))
        .ok();

    let chart = state.chart();
    let top = state
        .stats()
        .map(|stats| pipeline::top_contributors(stats, SUMMARY_TOP_N))
        .unwrap_or_default();

    if cli.json {
        let security = alerts.as_ref().map(|a| {
            json!({
                "summary": SecuritySummary::of(a),
                "alerts": a,
            })
        });
        let out = json!({
            "repo": repo,
            "range": range,
            "info": info,
            "languages": langs,
            "security": security,
            "top_contributors": top,
            "chart": chart,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let card = match &chart {
            ChartState::Ready(view) => svg::render_chart(&repo, info.as_ref(), view, theme),
            ChartState::Empty => svg::render_message(&repo, "No contributors found.", theme),
            ChartState::Failed(msg) => svg::render_message(&repo, &format!("Error: {msg}"), theme),
            ChartState::Idle | ChartState::Loading => {
                svg::render_message(&repo, "Loading contributors…", theme)
            }
        };
        fs::write(&cli.out, card)
            .with_context(|| format!("failed to write {}", cli.out.display()))?;
        print_summary(&repo, info.as_ref(), &langs, alerts.as_deref(), &top, &chart);
        println!("Wrote {}", cli.out.display());
    }

    if let ChartState::Failed(msg) = chart {
        bail!("could not load contributors for {repo}: {msg}");
    }

    Ok(())
}

fn print_summary(
    repo: &RepoId,
    info: Option<&repovista::RepoInfo>,
    langs: &[languages::LanguageShare],
    alerts: Option<&[SecurityAlert]>,
    top: &[ContributorStat],
    chart: &ChartState,
) {
    println!("{repo}");
    if let Some(i) = info {
        println!(
            "  stars {}  forks {}  watchers {}  open issues {}  license {}",
            i.stargazers_count,
            i.forks_count,
            i.watchers_count,
            i.open_issues_count,
            i.license
                .as_ref()
                .and_then(|l| l.spdx_id.as_deref())
                .unwrap_or("none")
        );
    }
    for l in langs {
        println!(
            "  {:<14} {:>5.1}%  {}",
            l.name,
            l.share * 100.0,
            format_bytes(l.bytes)
        );
    }

    match alerts {
        Some([]) => println!("  No open security alerts."),
        Some(alerts) => {
            let s = SecuritySummary::of(alerts);
            println!(
                "  {} open security alerts (critical {}, high {}, medium {}, low {}, unknown {})",
                s.total, s.critical, s.high, s.medium, s.low, s.unknown
            );
            for a in alerts {
                let patched = a
                    .patched_version
                    .as_deref()
                    .map(|v| format!(", patched in {v}"))
                    .unwrap_or_default();
                println!(
                    "    [{}] {}{}",
                    a.severity.as_str().to_uppercase(),
                    a.title,
                    patched
                );
            }
        }
        None => println!("  Security alerts unavailable."),
    }

    if !top.is_empty() {
        let names: Vec<String> = top
            .iter()
            .map(|c| format!("{} ({})", c.author, c.total_commits))
            .collect();
        println!("  top contributors: {}", names.join(", "));
    }

    match chart {
        ChartState::Ready(view) => {
            let s = view.summary;
            println!(
                "  {} contributors, {} commits (+{} / -{}), showing {} of {}",
                s.contributors,
                s.total_commits,
                s.total_additions,
                s.total_deletions,
                view.showing.visible,
                view.showing.matched
            );
            for e in &view.entries {
                println!(
                    "  {:>3}. {} {:<14} {:>6} commits {:>5.1}%",
                    e.rank,
                    e.tier.map(|t| t.medal()).unwrap_or("  "),
                    e.display_label,
                    e.total_commits,
                    e.percentage_share * 100.0
                );
            }
        }
        ChartState::Empty => println!("  No contributors found."),
        ChartState::Failed(msg) => println!("  Error: {msg}"),
        ChartState::Idle | ChartState::Loading => {}
    }
}
