//! Relevance-ranked search over the knowledge index.
//!
//! Scoring is lexical and deliberately simple: an exact id match wins
//! outright at 100 and bypasses the additive rules; otherwise an id
//! prefix match, a description substring match, and per-token hits
//! accumulate. Zero-score entries are excluded.

use serde::Serialize;

use super::index::{IndexEntry, KbIndex};
use crate::model::Category;

/// One ranked search result.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub entry: IndexEntry,
    pub relevance: u32,
}

/// Relevance score of one entry against a lowercased query.
///
/// - id equals query: 100, short-circuit — no further rules applied
/// - id starts with query: +50
/// - description contains query: +30
/// - each whitespace token of the query found in `id + " " + description`: +10
#[must_use]
pub fn relevance(entry: &IndexEntry, query: &str) -> u32 {
    let id = entry.id.to_lowercase();
    let description = entry.description.to_lowercase();

    // Exact ID match gets highest score
    if id == query {
        return 100;
    }

    let mut score = 0;

    // ID starts with query
    if id.starts_with(query) {
        score += 50;
    }

    // Description contains query
    if description.contains(query) {
        score += 30;
    }

    // Word matches across id + description
    let haystack = format!("{id} {description}");
    for word in query.split_whitespace() {
        if haystack.contains(word) {
            score += 10;
        }
    }

    score
}

/// Rank index entries against `query`, best first.
///
/// Filtering by category happens before scoring; results are truncated
/// to `limit` after the sort. The sort is stable, so ties keep the
/// index's insertion/category-enumeration order.
#[must_use]
pub fn search(
    index: &KbIndex,
    query: &str,
    limit: usize,
    filter: Option<Category>,
) -> Vec<SearchHit> {
    let query = query.to_lowercase();

    let mut hits: Vec<SearchHit> = index
        .entries()
        .iter()
        .filter(|e| filter.is_none_or(|c| e.category == c))
        .filter_map(|e| {
            let score = relevance(e, &query);
            (score > 0).then(|| SearchHit {
                entry: e.clone(),
                relevance: score,
            })
        })
        .collect();

    hits.sort_by(|a, b| b.relevance.cmp(&a.relevance));
    hits.truncate(limit);
    hits
}
