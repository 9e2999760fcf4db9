//! The similarity engine capability. The predictor only ever talks to the
//! `fit`/`predict` traits below, so any conforming neighborhood or
//! matrix-factorization engine can stand in — including a stub in unit tests.

pub mod knn;

use rating_core::{RatingResult, RatingScale};
use rating_matrix::TripleTable;

pub use knn::{KnnModel, KnnTrainer};

/// A trained model that can estimate the rating a user would give a content.
pub trait RatingModel {
    /// Estimated rating for the pair. Returns `RatingError::Unestimable`
    /// when the model has no basis for an estimate (unknown user/content or
    /// an empty neighborhood).
    fn predict(&self, user_id: &str, content_id: &str) -> RatingResult<f64>;
}

/// Trains a [`RatingModel`] from the sparse-triple table.
pub trait ModelTrainer {
    type Model: RatingModel;

    fn fit(&self, table: &TripleTable, scale: RatingScale) -> RatingResult<Self::Model>;
}
