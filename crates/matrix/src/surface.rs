use std::collections::HashMap;

use ndarray::Array2;
use rating_core::{Cohort, RatingError, RatingResult};
use tracing::debug;

use crate::triples::TripleTable;

/// Dense user×content rating surface. Rows follow the cohort's user order,
/// columns its content order; a cell is either a rating or absent.
#[derive(Debug, Clone)]
pub struct RatingSurface {
    users: Vec<String>,
    contents: Vec<String>,
    user_index: HashMap<String, usize>,
    content_index: HashMap<String, usize>,
    cells: Array2<Option<f64>>,
}

impl RatingSurface {
    /// An all-absent surface shaped by the cohort.
    pub fn empty(cohort: &Cohort) -> Self {
        let users: Vec<String> = cohort.users().to_vec();
        let contents: Vec<String> = cohort.contents().to_vec();
        let user_index = users
            .iter()
            .enumerate()
            .map(|(i, u)| (u.clone(), i))
            .collect();
        let content_index = contents
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        let cells = Array2::from_elem((users.len(), contents.len()), None);
        Self {
            users,
            contents,
            user_index,
            content_index,
            cells,
        }
    }

    /// Materialize the sparse table into a dense surface. Duplicate
    /// coordinates overwrite in input order, so the last occurrence wins.
    /// Fails with `UnknownCoordinate` when a row references an id outside the
    /// cohort; upstream invariants should make that impossible.
    pub fn from_triples(cohort: &Cohort, table: &TripleTable) -> RatingResult<Self> {
        let mut surface = Self::empty(cohort);
        for row in table.rows() {
            surface.set(&row.user_id, &row.content_id, row.rating)?;
        }
        debug!(
            users = surface.users.len(),
            contents = surface.contents.len(),
            known = surface.known_count(),
            "Dense surface materialized"
        );
        Ok(surface)
    }

    pub fn users(&self) -> &[String] {
        &self.users
    }

    pub fn contents(&self) -> &[String] {
        &self.contents
    }

    pub fn value_at(&self, user_idx: usize, content_idx: usize) -> Option<f64> {
        self.cells[(user_idx, content_idx)]
    }

    pub fn set_at(&mut self, user_idx: usize, content_idx: usize, rating: f64) {
        self.cells[(user_idx, content_idx)] = Some(rating);
    }

    pub fn set(&mut self, user_id: &str, content_id: &str, rating: f64) -> RatingResult<()> {
        let (u, c) = self.coordinate(user_id, content_id)?;
        self.cells[(u, c)] = Some(rating);
        Ok(())
    }

    pub fn get(&self, user_id: &str, content_id: &str) -> RatingResult<Option<f64>> {
        let (u, c) = self.coordinate(user_id, content_id)?;
        Ok(self.cells[(u, c)])
    }

    pub fn known_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn absent_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    fn coordinate(&self, user_id: &str, content_id: &str) -> RatingResult<(usize, usize)> {
        match (
            self.user_index.get(user_id),
            self.content_index.get(content_id),
        ) {
            (Some(&u), Some(&c)) => Ok((u, c)),
            _ => Err(RatingError::UnknownCoordinate {
                user: user_id.to_string(),
                content: content_id.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triples::TripleTable;
    use rating_core::Interaction;

    fn interaction(id: &str, user: &str, content: &str, rating: f64) -> Interaction {
        Interaction {
            interaction_id: id.to_string(),
            user_id: user.to_string(),
            content_id: content.to_string(),
            rating,
        }
    }

    fn cohort() -> Cohort {
        Cohort::new(
            vec!["1".into(), "2".into()],
            vec!["1".into(), "2".into()],
        )
        .unwrap()
    }

    #[test]
    fn empty_surface_is_all_absent() {
        let surface = RatingSurface::empty(&cohort());
        assert_eq!(surface.absent_count(), 4);
        assert_eq!(surface.known_count(), 0);
    }

    #[test]
    fn duplicate_coordinate_last_write_wins() {
        let table = TripleTable::from_interactions(&[
            interaction("1", "1", "1", 4.0),
            interaction("2", "1", "1", 2.5),
        ]);
        let surface = RatingSurface::from_triples(&cohort(), &table).unwrap();
        assert_eq!(surface.get("1", "1").unwrap(), Some(2.5));
        assert_eq!(surface.known_count(), 1);
    }

    #[test]
    fn out_of_cohort_row_is_unknown_coordinate() {
        let table = TripleTable::from_interactions(&[interaction("1", "99", "1", 4.0)]);
        let err = RatingSurface::from_triples(&cohort(), &table).unwrap_err();
        assert!(matches!(err, RatingError::UnknownCoordinate { .. }));
    }

    #[test]
    fn rows_follow_cohort_order() {
        let surface = RatingSurface::empty(&cohort());
        assert_eq!(surface.users(), ["1", "2"]);
        assert_eq!(surface.contents(), ["1", "2"]);
    }
}
