use std::cmp::Ordering;
use std::collections::HashMap;

use ndarray::Array2;
use rating_core::{EngineConfig, RatingError, RatingResult, RatingScale};
use rating_matrix::TripleTable;
use tracing::debug;

use crate::{ModelTrainer, RatingModel};

/// User-based KNN with cosine similarity over co-rated contents. The estimate
/// for a pair is the similarity-weighted mean of the neighbors' ratings for
/// that content, clamped to the rating scale.
#[derive(Debug, Clone)]
pub struct KnnTrainer {
    neighbors: usize,
    min_support: usize,
}

impl KnnTrainer {
    pub fn new(neighbors: usize, min_support: usize) -> Self {
        Self {
            neighbors,
            min_support,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.neighbors, config.min_support)
    }
}

impl Default for KnnTrainer {
    fn default() -> Self {
        Self::new(40, 1)
    }
}

impl ModelTrainer for KnnTrainer {
    type Model = KnnModel;

    fn fit(&self, table: &TripleTable, scale: RatingScale) -> RatingResult<KnnModel> {
        // Training input is the deduplicated table: duplicate coordinates
        // collapse last-write-wins before any arithmetic.
        let rows = table.dedup_last_write();

        let mut user_index: HashMap<String, usize> = HashMap::new();
        let mut content_index: HashMap<String, usize> = HashMap::new();
        for row in &rows {
            let next = user_index.len();
            user_index.entry(row.user_id.clone()).or_insert(next);
            let next = content_index.len();
            content_index.entry(row.content_id.clone()).or_insert(next);
        }

        let mut ratings: Array2<Option<f64>> =
            Array2::from_elem((user_index.len(), content_index.len()), None);
        for row in &rows {
            let u = user_index[&row.user_id];
            let c = content_index[&row.content_id];
            ratings[(u, c)] = Some(row.rating);
        }

        let similarity = cosine_similarity(&ratings, self.min_support);
        debug!(
            users = user_index.len(),
            contents = content_index.len(),
            ratings = rows.len(),
            "KNN model trained"
        );

        Ok(KnnModel {
            user_index,
            content_index,
            ratings,
            similarity,
            neighbors: self.neighbors,
            scale,
        })
    }
}

/// Cosine similarity between every user pair, computed over the contents both
/// users rated. Pairs with fewer co-rated contents than `min_support` get
/// similarity 0.
fn cosine_similarity(ratings: &Array2<Option<f64>>, min_support: usize) -> Array2<f64> {
    let n_users = ratings.nrows();
    let mut sim = Array2::zeros((n_users, n_users));
    for u in 0..n_users {
        sim[(u, u)] = 1.0;
        for v in (u + 1)..n_users {
            let mut dot = 0.0;
            let mut norm_u = 0.0;
            let mut norm_v = 0.0;
            let mut support = 0usize;
            for c in 0..ratings.ncols() {
                if let (Some(ru), Some(rv)) = (ratings[(u, c)], ratings[(v, c)]) {
                    dot += ru * rv;
                    norm_u += ru * ru;
                    norm_v += rv * rv;
                    support += 1;
                }
            }
            let value = if support >= min_support && norm_u > 0.0 && norm_v > 0.0 {
                dot / (norm_u.sqrt() * norm_v.sqrt())
            } else {
                0.0
            };
            sim[(u, v)] = value;
            sim[(v, u)] = value;
        }
    }
    sim
}

/// Trained user-based KNN model. Owned by the predictor for one run.
#[derive(Debug, Clone)]
pub struct KnnModel {
    user_index: HashMap<String, usize>,
    content_index: HashMap<String, usize>,
    ratings: Array2<Option<f64>>,
    similarity: Array2<f64>,
    neighbors: usize,
    scale: RatingScale,
}

impl RatingModel for KnnModel {
    fn predict(&self, user_id: &str, content_id: &str) -> RatingResult<f64> {
        let &u = self.user_index.get(user_id).ok_or_else(|| unestimable(
            user_id,
            content_id,
            "user has no ratings in the trainset",
        ))?;
        let &c = self.content_index.get(content_id).ok_or_else(|| unestimable(
            user_id,
            content_id,
            "content has no ratings in the trainset",
        ))?;

        // Candidate neighbors: every other user with a rating for this
        // content and positive similarity. Sorted by similarity descending,
        // ties broken by user index so the estimate is deterministic.
        let mut candidates: Vec<(usize, f64)> = (0..self.ratings.nrows())
            .filter(|&v| v != u)
            .filter(|&v| self.ratings[(v, c)].is_some())
            .map(|v| (v, self.similarity[(u, v)]))
            .filter(|&(_, s)| s > 0.0)
            .collect();
        candidates.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        candidates.truncate(self.neighbors);

        if candidates.is_empty() {
            return Err(unestimable(
                user_id,
                content_id,
                "no similar user rated the content",
            ));
        }

        let mut weighted = 0.0;
        let mut weight = 0.0;
        for (v, s) in candidates {
            // filter above guarantees the rating is present
            if let Some(r) = self.ratings[(v, c)] {
                weighted += s * r;
                weight += s;
            }
        }
        Ok(self.scale.clamp(weighted / weight))
    }
}

fn unestimable(user_id: &str, content_id: &str, reason: &str) -> RatingError {
    RatingError::Unestimable {
        user: user_id.to_string(),
        content: content_id.to_string(),
        reason: reason.to_string(),
    }
}
