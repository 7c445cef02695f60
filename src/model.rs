//! Data model: repository identity, upstream records and normalized stats.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::DashboardError;

/// An `owner/repo` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

impl RepoId {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl FromStr for RepoId {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || DashboardError::InvalidRepoId(trimmed.to_string());

        let (owner, repo) = trimmed.split_once('/').ok_or_else(invalid)?;
        let (owner, repo) = (owner.trim(), repo.trim());
        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            return Err(invalid());
        }

        Ok(Self::new(owner, repo))
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// One week of activity in a contributor's breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct WeekStat {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub week_start: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub additions: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub deletions: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub commits: Option<u64>,
}

/// A contributor record exactly as the backend sent it.
///
/// Every field is optional; numeric fields that are missing, negative or not
/// numbers at all decode as `None` so a single odd value never poisons the
/// whole response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawContributorStat {
    #[serde(default, deserialize_with = "lenient_string")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total_commits: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total_additions: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total_deletions: Option<u64>,
    #[serde(default, deserialize_with = "lenient_weeks")]
    pub weeks: Option<Vec<WeekStat>>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub avatar_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub profile_url: Option<String>,
    /// GitHub's name for the profile link; used when `profile_url` is absent.
    #[serde(default, deserialize_with = "lenient_string")]
    pub html_url: Option<String>,
}

/// A normalized per-contributor aggregate. All totals are populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContributorStat {
    pub author: String,
    pub total_commits: u64,
    pub total_additions: u64,
    pub total_deletions: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weeks: Option<Vec<WeekStat>>,
    pub avatar_url: String,
    pub profile_url: String,
}

impl ContributorStat {
    /// Build a stat with explicit totals and identity-derived links.
    pub fn new(author: impl Into<String>, commits: u64, additions: u64, deletions: u64) -> Self {
        let author = author.into();
        Self {
            avatar_url: avatar_url_for(&author),
            profile_url: profile_url_for(&author),
            author,
            total_commits: commits,
            total_additions: additions,
            total_deletions: deletions,
            weeks: None,
        }
    }
}

/// Avatar image keyed by identity.
pub fn avatar_url_for(author: &str) -> String {
    format!("https://github.com/{author}.png?size=40")
}

/// Profile page keyed by identity.
pub fn profile_url_for(author: &str) -> String {
    format!("https://github.com/{author}")
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct License {
    #[serde(default)]
    pub spdx_id: Option<String>,
}

/// Repository summary from `/repo/info`. Displayed as-is, never transformed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RepoInfo {
    pub full_name: Option<String>,
    pub description: Option<String>,
    pub html_url: Option<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub watchers_count: u64,
    pub open_issues_count: u64,
    pub license: Option<License>,
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(as_count))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn lenient_weeks<'de, D>(deserializer: D) -> Result<Option<Vec<WeekStat>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(items)) = value else {
        return Ok(None);
    };

    // Entries that aren't objects contribute nothing.
    let weeks = items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<WeekStat>(item).ok())
        .collect();
    Ok(Some(weeks))
}

/// Non-negative integral counts; floats with no fractional part are accepted.
fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_owner_and_repo() {
        let id: RepoId = " vercel/next.js ".parse().unwrap();
        assert_eq!(id, RepoId::new("vercel", "next.js"));
        assert_eq!(id.to_string(), "vercel/next.js");
    }

    #[test]
    fn rejects_malformed_identifiers() {
        for bad in ["", "vercel", "/next.js", "vercel/", "a/b/c"] {
            assert!(
                matches!(bad.parse::<RepoId>(), Err(DashboardError::InvalidRepoId(_))),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn raw_record_tolerates_odd_numbers() {
        let raw: RawContributorStat = serde_json::from_value(json!({
            "author": "octocat",
            "total_commits": 7,
            "total_additions": "12",
            "total_deletions": -3,
            "weeks": [{"week_start": 1, "additions": 4.0}, "garbage"],
        }))
        .unwrap();

        assert_eq!(raw.author.as_deref(), Some("octocat"));
        assert_eq!(raw.total_commits, Some(7));
        assert_eq!(raw.total_additions, None);
        assert_eq!(raw.total_deletions, None);
        let weeks = raw.weeks.unwrap();
        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0].additions, Some(4));
        assert_eq!(weeks[0].deletions, None);
    }

    #[test]
    fn html_url_is_decoded_separately() {
        let raw: RawContributorStat = serde_json::from_value(json!({
            "author": "octocat",
            "html_url": "https://example.com/octocat",
        }))
        .unwrap();
        assert_eq!(raw.profile_url, None);
        assert_eq!(raw.html_url.as_deref(), Some("https://example.com/octocat"));
    }

    #[test]
    fn repo_info_defaults_missing_counters() {
        let info: RepoInfo = serde_json::from_value(json!({
            "full_name": "rust-lang/rust",
            "stargazers_count": 100,
            "license": {"spdx_id": "MIT"},
        }))
        .unwrap();
        assert_eq!(info.stargazers_count, 100);
        assert_eq!(info.forks_count, 0);
        assert_eq!(info.license.and_then(|l| l.spdx_id).as_deref(), Some("MIT"));
    }
}
