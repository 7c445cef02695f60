use crate::model::ContributorStat;

/// Keep contributors whose author contains `query`, ignoring case.
///
/// The query is trimmed first; an empty or whitespace-only query returns the
/// input unchanged. Relative order of matches is preserved.
pub fn search(stats: &[ContributorStat], query: &str) -> Vec<ContributorStat> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return stats.to_vec();
    }

    stats
        .iter()
        .filter(|s| s.author.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
