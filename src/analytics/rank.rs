//! Ranking and truncation of frequency maps.
//!
//! Counters are insertion-ordered (`IndexMap`), and the sort is stable, so
//! ties keep first-seen order. That is the documented tie-break.

use indexmap::IndexMap;

/// Tools kept in the public artifact.
pub const TOP_TOOLS: usize = 20;

/// Branches kept in the public artifact.
pub const TOP_BRANCHES: usize = 15;

/// Projects kept in the public artifact.
pub const TOP_PROJECTS: usize = 10;

/// Sort a frequency map descending by count and keep the top `n` entries.
#[must_use]
pub fn top_n(counts: &IndexMap<String, u64>, n: usize) -> Vec<(String, u64)> {
    let mut entries: Vec<(String, u64)> = counts
        .iter()
        .map(|(name, count)| (name.clone(), *count))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(n);
    entries
}
