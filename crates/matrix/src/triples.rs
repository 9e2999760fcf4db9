use std::collections::hash_map::Entry;
use std::collections::HashMap;

use rating_core::Interaction;
use serde::{Deserialize, Serialize};

/// One known rating: a (user, content, rating) row of the sparse table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingTriple {
    pub user_id: String,
    pub content_id: String,
    pub rating: f64,
}

/// The sparse-triple table used to train the similarity model. Duplicate
/// (user, content) coordinates are allowed; the last occurrence in input
/// order wins when the table is materialized or deduplicated.
#[derive(Debug, Clone, Default)]
pub struct TripleTable {
    rows: Vec<RatingTriple>,
}

impl TripleTable {
    pub fn from_interactions(interactions: &[Interaction]) -> Self {
        let rows = interactions
            .iter()
            .map(|i| RatingTriple {
                user_id: i.user_id.clone(),
                content_id: i.content_id.clone(),
                rating: i.rating,
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[RatingTriple] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Collapse duplicate coordinates with an explicit last-write-wins fold
    /// over input order. Row order of first occurrences is preserved, so the
    /// result is deterministic for a fixed input.
    pub fn dedup_last_write(&self) -> Vec<RatingTriple> {
        let mut slot: HashMap<(String, String), usize> = HashMap::new();
        let mut deduped: Vec<RatingTriple> = Vec::new();
        for row in &self.rows {
            match slot.entry((row.user_id.clone(), row.content_id.clone())) {
                Entry::Vacant(entry) => {
                    entry.insert(deduped.len());
                    deduped.push(row.clone());
                }
                Entry::Occupied(entry) => {
                    deduped[*entry.get()].rating = row.rating;
                }
            }
        }
        deduped
    }
}
