//! Language composition of a repository.

use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageShare {
    pub name: String,
    pub bytes: u64,
    /// Fraction of all bytes, in `[0, 1]`.
    pub share: f64,
}

/// Languages by size, largest first. Ties stay in name order.
pub fn language_breakdown(languages: &BTreeMap<String, u64>) -> Vec<LanguageShare> {
    let total = languages
        .values()
        .fold(0u64, |acc, b| acc.saturating_add(*b));

    let mut out: Vec<LanguageShare> = languages
        .iter()
        .map(|(name, bytes)| LanguageShare {
            name: name.clone(),
            bytes: *bytes,
            share: if total == 0 {
                0.0
            } else {
                *bytes as f64 / total as f64
            },
        })
        .collect();
    out.sort_by(|a, b| b.bytes.cmp(&a.bytes));
    out
}

/// Human-readable size: `B` below 1 KiB, then `KB`/`MB` with one decimal.
pub fn format_bytes(n: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;

    if n < KIB {
        format!("{n} B")
    } else if n < MIB {
        format!("{:.1} KB", n as f64 / KIB as f64)
    } else {
        format!("{:.1} MB", n as f64 / MIB as f64)
    }
}
