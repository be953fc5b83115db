use std::collections::BTreeMap;

use serde::Serialize;

use super::ResultSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: u16,
    pub count: u64,
}

/// Counts results per status code, ascending by code.
#[must_use]
pub fn status_distribution(results: &ResultSet) -> Vec<StatusCount> {
    let mut counts: BTreeMap<u16, u64> = BTreeMap::new();
    for result in results {
        let entry = counts.entry(result.status).or_insert(0);
        *entry = entry.saturating_add(1);
    }
    counts
        .into_iter()
        .map(|(status, count)| StatusCount { status, count })
        .collect()
}
