use rating_core::{Cohort, Interaction, RatingResult};
use tracing::debug;

/// Derive the active cohort from the base dataset: the distinct user and
/// content identifiers, each sorted ascending by numeric value.
pub fn build_cohort(base: &[Interaction]) -> RatingResult<Cohort> {
    let users = base.iter().map(|i| i.user_id.clone()).collect();
    let contents = base.iter().map(|i| i.content_id.clone()).collect();
    let cohort = Cohort::new(users, contents)?;
    debug!(
        users = cohort.users().len(),
        contents = cohort.contents().len(),
        "Cohort derived from base dataset"
    );
    Ok(cohort)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interaction(id: &str, user: &str, content: &str, rating: f64) -> Interaction {
        Interaction {
            interaction_id: id.to_string(),
            user_id: user.to_string(),
            content_id: content.to_string(),
            rating,
        }
    }

    #[test]
    fn distinct_sorted_ids() {
        let base = vec![
            interaction("1", "12", "7", 4.0),
            interaction("2", "3", "7", 2.0),
            interaction("3", "12", "10", 5.0),
            interaction("4", "3", "2", 3.0),
        ];
        let cohort = build_cohort(&base).unwrap();
        assert_eq!(cohort.users(), ["3", "12"]);
        assert_eq!(cohort.contents(), ["2", "7", "10"]);
    }

    #[test]
    fn non_numeric_user_id_fails() {
        let base = vec![interaction("1", "u1", "7", 4.0)];
        assert!(build_cohort(&base).is_err());
    }

    #[test]
    fn empty_base_yields_empty_cohort() {
        let cohort = build_cohort(&[]).unwrap();
        assert!(cohort.users().is_empty());
        assert!(cohort.contents().is_empty());
    }
}
