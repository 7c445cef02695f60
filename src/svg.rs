use serde::{Deserialize, Serialize};

use crate::model::{RepoId, RepoInfo};
use crate::rank::DisplayMode;
use crate::view::{ChartView, RankTier, ViewEntry};

const START_Y: i32 = 40;
const HEADER_LINES: i32 = 3;
const LINE_HEIGHT: i32 = 28;
const LEFT_PADDING: f32 = 20.0;
const MEDAL_WIDTH: f32 = 32.0;
const LABEL_WIDTH: f32 = 150.0;
const BAR_TRACK_WIDTH: f32 = 300.0;
const BAR_HEIGHT: f32 = 18.0;
const RIGHT_PADDING: f32 = 30.0;

const GOLD: &str = "#ffe156";
const SILVER: &str = "#bcc7d9";
const BRONZE: &str = "#b67a4d";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

pub struct ThemeColors {
    pub bg: &'static str,
    pub text: &'static str,
    pub muted: &'static str,
    pub bar: &'static str,
}

impl Theme {
    pub fn colors(self) -> ThemeColors {
        match self {
            Theme::Dark => ThemeColors {
                bg: "#161b22",
                text: "#c9d1d9",
                muted: "#616e7f",
                bar: "#4fa3ff",
            },
            Theme::Light => ThemeColors {
                bg: "#ffffff",
                text: "#1d3557",
                muted: "#8c9bab",
                bar: "#4fa3ff",
            },
        }
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn tier_color(tier: Option<RankTier>, fallback: &'static str) -> &'static str {
    match tier {
        Some(RankTier::Gold) => GOLD,
        Some(RankTier::Silver) => SILVER,
        Some(RankTier::Bronze) => BRONZE,
        None => fallback,
    }
}

fn header_lines(repo: &RepoId, info: Option<&RepoInfo>, chart: &ChartView) -> [String; 3] {
    let title = format!("Top Contributors · {repo}");

    let showing = match chart.showing.mode {
        DisplayMode::All => format!("Showing all {}", chart.showing.matched),
        DisplayMode::Top(n) => format!("Showing top {n}"),
    };
    let totals = format!(
        "{} contributors • {} commits • +{} / -{}",
        chart.summary.contributors,
        chart.summary.total_commits,
        chart.summary.total_additions,
        chart.summary.total_deletions
    );
    let meta = match info {
        Some(i) => format!(
            "★ {}  ⑂ {}  ◉ {}  ! {}  ·  {showing}",
            i.stargazers_count, i.forks_count, i.watchers_count, i.open_issues_count
        ),
        None => showing,
    };

    [title, meta, totals]
}

fn build_row(entry: &ViewEntry, y: i32, colors: &ThemeColors) -> String {
    let label_x = LEFT_PADDING + MEDAL_WIDTH;
    let bar_x = label_x + LABEL_WIDTH;
    let bar_w = entry.bar_fraction as f32 * BAR_TRACK_WIDTH;
    let bar_y = y as f32 - BAR_HEIGHT + 4.0;
    let medal = entry.tier.map(RankTier::medal).unwrap_or("");
    let fill = tier_color(entry.tier, colors.bar);

    format!(
        r#"<a href="{href}">
<title>{author}: {commits} commits ({share:.1}%)</title>
<text x="{LEFT_PADDING}" y="{y}">{medal}</text>
<text x="{label_x}" y="{y}" class="name">{label}</text>
<rect x="{bar_x}" y="{bar_y}" width="{bar_w:.1}" height="{BAR_HEIGHT}" rx="6" fill="{fill}"/>
<text x="{count_x:.1}" y="{y}" class="count">{commits}</text>
</a>
"#,
        href = escape_xml(&entry.profile_url),
        author = escape_xml(&entry.author),
        commits = entry.total_commits,
        share = entry.percentage_share * 100.0,
        label = escape_xml(&entry.display_label),
        count_x = bar_x + bar_w + 6.0,
    )
}

/// Render the contributor chart as a standalone SVG card.
pub fn render_chart(
    repo: &RepoId,
    info: Option<&RepoInfo>,
    chart: &ChartView,
    theme: Theme,
) -> String {
    let colors = theme.colors();

    let mut header = String::new();
    for (i, line) in header_lines(repo, info, chart).iter().enumerate() {
        let y = START_Y + i as i32 * LINE_HEIGHT;
        let class = if i == 0 { "title" } else { "muted" };
        header.push_str(&format!(
            "<text x=\"{LEFT_PADDING}\" y=\"{y}\" class=\"{class}\">{}</text>\n",
            escape_xml(line)
        ));
    }

    let first_row_y = START_Y + HEADER_LINES * LINE_HEIGHT;
    let mut rows = String::new();
    for (i, entry) in chart.entries.iter().enumerate() {
        rows.push_str(&build_row(entry, first_row_y + i as i32 * LINE_HEIGHT, &colors));
    }
    if chart.entries.is_empty() {
        rows.push_str(&format!(
            "<text x=\"{LEFT_PADDING}\" y=\"{first_row_y}\" class=\"muted\">No contributors found.</text>\n"
        ));
    }

    let row_count = chart.entries.len().max(1) as i32;
    let h = (first_row_y + row_count * LINE_HEIGHT) as f32;
    let w = LEFT_PADDING + MEDAL_WIDTH + LABEL_WIDTH + BAR_TRACK_WIDTH + 60.0 + RIGHT_PADDING;

    format!(
        r#"<?xml version='1.0' encoding='UTF-8'?>
<svg xmlns="http://www.w3.org/2000/svg"
     width="{w}px" height="{h}px"
     font-family="ConsolasFallback,Consolas,monospace"
     font-size="15px">

<style>
.title {{ fill: {text}; font-size: 20px; font-weight: bold; }}
.muted {{ fill: {muted}; font-size: 13px; }}
.name  {{ fill: {text}; font-weight: 600; }}
.count {{ fill: {text}; font-weight: bold; }}
</style>

<rect width="{w}px" height="{h}px" fill="{bg}" rx="15"/>

<!-- HEADER -->
<g>
{header}</g>

<!-- ROWS -->
<g fill="{text}">
{rows}</g>

</svg>
"#,
        bg = colors.bg,
        text = colors.text,
        muted = colors.muted,
    )
}

/// Placeholder card for states without chart data.
pub fn render_message(repo: &RepoId, message: &str, theme: Theme) -> String {
    let colors = theme.colors();
    format!(
        r#"<?xml version='1.0' encoding='UTF-8'?>
<svg xmlns="http://www.w3.org/2000/svg" width="500px" height="100px"
     font-family="ConsolasFallback,Consolas,monospace" font-size="15px">
<rect width="500px" height="100px" fill="{bg}" rx="15"/>
<text x="{LEFT_PADDING}" y="{START_Y}" fill="{text}">{title}</text>
<text x="{LEFT_PADDING}" y="{y2}" fill="{muted}">{message}</text>
</svg>
"#,
        bg = colors.bg,
        text = colors.text,
        muted = colors.muted,
        title = escape_xml(&format!("Top Contributors · {repo}")),
        message = escape_xml(message),
        y2 = START_Y + LINE_HEIGHT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ContributorStat;
    use crate::pipeline::{PipelineOptions, build_chart};

    fn chart() -> ChartView {
        let stats = vec![
            ContributorStat::new("a<b>", 9, 1, 1),
            ContributorStat::new("second", 5, 0, 0),
            ContributorStat::new("third", 3, 0, 0),
            ContributorStat::new("a-very-long-contributor-name", 1, 0, 0),
        ];
        build_chart(&stats, &PipelineOptions::default())
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_xml("<a & \"b\">"), "&lt;a &amp; &quot;b&quot;&gt;");
    }

    #[test]
    fn rows_carry_tier_colors_and_full_names() {
        let svg = render_chart(&RepoId::new("o", "r"), None, &chart(), Theme::Dark);
        assert!(svg.contains(GOLD));
        assert!(svg.contains(SILVER));
        assert!(svg.contains(BRONZE));
        assert!(svg.contains("a&lt;b&gt;"));
        assert!(svg.contains("a-very-long-contributor-name: 1 commits"));
        assert!(svg.contains("a-very-long-…"));
        assert!(svg.contains("Showing top 15"));
    }

    #[test]
    fn empty_chart_says_so() {
        let empty = build_chart(&[], &PipelineOptions::default());
        let svg = render_chart(&RepoId::new("o", "r"), None, &empty, Theme::Light);
        assert!(svg.contains("No contributors found."));
        assert!(svg.contains("#ffffff"));
    }

    #[test]
    fn info_counters_appear_in_header() {
        let info = RepoInfo {
            stargazers_count: 42,
            forks_count: 7,
            ..Default::default()
        };
        let svg = render_chart(&RepoId::new("o", "r"), Some(&info), &chart(), Theme::Dark);
        assert!(svg.contains("★ 42"));
        assert!(svg.contains("⑂ 7"));
    }
}
