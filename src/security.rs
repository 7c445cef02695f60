//! Dependabot alerts for the analyzed repository.
//!
//! The backend relays GitHub's alert objects untouched, so every field is
//! looked up leniently: a missing, empty or mistyped value just falls
//! through to the next candidate.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

const CVE_LINK_BASE: &str = "https://cve.mitre.org/cgi-bin/cvename.cgi?name=";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    #[default]
    Unknown,
}

impl Severity {
    /// GitHub's severity names; `moderate` is the advisory database's
    /// spelling of `medium`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Severity::Critical,
            "high" => Severity::High,
            "medium" | "moderate" => Severity::Medium,
            "low" => Severity::Low,
            _ => Severity::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The vulnerable package as it appears in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
    pub ecosystem: Option<String>,
    pub name: String,
    pub manifest_path: Option<String>,
}

/// An advisory identifier such as `CVE-2021-23337` or a GHSA id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvisoryId {
    pub kind: String,
    pub value: String,
    /// Only CVE identifiers get a link.
    pub link: Option<String>,
}

impl AdvisoryId {
    fn new(kind: String, value: String) -> Self {
        let link = (kind == "CVE").then(|| format!("{CVE_LINK_BASE}{value}"));
        Self { kind, value, link }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityAlert {
    pub number: Option<u64>,
    pub state: Option<String>,
    pub html_url: Option<String>,
    pub severity: Severity,
    pub title: String,
    pub description: Option<String>,
    pub cvss_score: Option<f64>,
    pub vulnerable_range: Option<String>,
    pub patched_version: Option<String>,
    pub dependency: Option<Dependency>,
    pub identifiers: Vec<AdvisoryId>,
    pub references: Vec<String>,
}

impl SecurityAlert {
    /// Read one alert object.
    ///
    /// Severity: advisory, then vulnerability, then [`Severity::Unknown`].
    /// Title: advisory summary, then the vulnerable package, then the
    /// dependency's package, then `"Unknown"`.
    pub fn from_value(alert: &Value) -> Self {
        let severity = text(alert, "/security_advisory/severity")
            .or_else(|| text(alert, "/security_vulnerability/severity"))
            .map(Severity::parse)
            .unwrap_or_default();

        let title = text(alert, "/security_advisory/summary")
            .or_else(|| text(alert, "/security_vulnerability/package/name"))
            .or_else(|| text(alert, "/dependency/package/name"))
            .unwrap_or("Unknown")
            .to_string();

        let dependency = text(alert, "/dependency/package/name").map(|name| Dependency {
            ecosystem: owned(alert, "/dependency/package/ecosystem"),
            name: name.to_string(),
            manifest_path: owned(alert, "/dependency/manifest_path"),
        });

        let identifiers = items(alert, "/security_advisory/identifiers")
            .filter_map(|id| {
                let kind = text(id, "/type")?;
                let value = text(id, "/value")?;
                Some(AdvisoryId::new(kind.to_string(), value.to_string()))
            })
            .collect();

        let references = items(alert, "/security_advisory/references")
            .filter_map(|r| owned(r, "/url"))
            .collect();

        Self {
            number: alert.get("number").and_then(Value::as_u64),
            state: owned(alert, "/state"),
            html_url: owned(alert, "/html_url"),
            severity,
            title,
            description: owned(alert, "/security_advisory/description"),
            cvss_score: alert
                .pointer("/security_advisory/cvss/score")
                .and_then(Value::as_f64),
            vulnerable_range: owned(alert, "/security_vulnerability/vulnerable_version_range"),
            patched_version: owned(
                alert,
                "/security_vulnerability/first_patched_version/identifier",
            ),
            dependency,
            identifiers,
            references,
        }
    }
}

/// Decode the backend's `{"alerts": [...]}` body.
///
/// A body without an `alerts` array yields no alerts. Elements that are not
/// objects are skipped.
pub fn decode_alerts(body: Value) -> Vec<SecurityAlert> {
    let Some(Value::Array(alerts)) = body.get("alerts") else {
        debug!("security response has no alerts array");
        return Vec::new();
    };

    alerts
        .iter()
        .enumerate()
        .filter_map(|(index, alert)| {
            if alert.is_object() {
                Some(SecurityAlert::from_value(alert))
            } else {
                debug!(index, "skipping security alert that is not an object");
                None
            }
        })
        .collect()
}

/// Alert counts per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SecuritySummary {
    pub total: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub unknown: usize,
}

impl SecuritySummary {
    pub fn of(alerts: &[SecurityAlert]) -> Self {
        alerts.iter().fold(Self::default(), |mut acc, a| {
            acc.total += 1;
            match a.severity {
                Severity::Critical => acc.critical += 1,
                Severity::High => acc.high += 1,
                Severity::Medium => acc.medium += 1,
                Severity::Low => acc.low += 1,
                Severity::Unknown => acc.unknown += 1,
            }
            acc
        })
    }
}

/// Non-empty string at `pointer`.
fn text<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn owned(value: &Value, pointer: &str) -> Option<String> {
    text(value, pointer).map(str::to_string)
}

fn items<'a>(value: &'a Value, pointer: &str) -> impl Iterator<Item = &'a Value> {
    value
        .pointer(pointer)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}
