use rating_core::{Cohort, RatingError, RatingResult};
use rating_matrix::RatingSurface;
use rating_similarity::RatingModel;
use tracing::warn;

/// Output of the prediction sweep.
#[derive(Debug)]
pub struct Prediction {
    /// Only the cells the model filled in; absent wherever a rating was known.
    pub predicted_only: RatingSurface,
    /// Known cells verbatim plus predictions for the rest.
    pub completed: RatingSurface,
    pub predicted_cells: usize,
    /// (user, content) pairs the model could not estimate; left absent.
    pub unestimable: Vec<(String, String)>,
}

/// Sweep the cohort cross-product in row-major order. Known ratings are
/// copied verbatim into the completed surface (ground truth always wins);
/// every absent cell is asked of the model. Cells are independent, so the
/// sweep order does not affect any cell's value.
///
/// An unestimable pair is recorded and skipped; any other model failure
/// aborts the run.
pub fn complete_surface<M: RatingModel>(
    known: &RatingSurface,
    cohort: &Cohort,
    model: &M,
) -> RatingResult<Prediction> {
    let mut predicted_only = RatingSurface::empty(cohort);
    let mut completed = RatingSurface::empty(cohort);
    let mut predicted_cells = 0usize;
    let mut unestimable = Vec::new();

    for (u, user) in cohort.users().iter().enumerate() {
        for (c, content) in cohort.contents().iter().enumerate() {
            match known.value_at(u, c) {
                Some(rating) => completed.set_at(u, c, rating),
                None => match model.predict(user, content) {
                    Ok(estimate) => {
                        predicted_only.set_at(u, c, estimate);
                        completed.set_at(u, c, estimate);
                        predicted_cells += 1;
                    }
                    Err(RatingError::Unestimable { reason, .. }) => {
                        warn!(user = %user, content = %content, %reason, "Cell left absent");
                        unestimable.push((user.clone(), content.clone()));
                    }
                    Err(other) => return Err(other),
                },
            }
        }
    }

    Ok(Prediction {
        predicted_only,
        completed,
        predicted_cells,
        unestimable,
    })
}
