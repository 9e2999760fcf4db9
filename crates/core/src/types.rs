use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{RatingError, RatingResult};

/// A single observed user-content interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub interaction_id: String,
    pub user_id: String,
    pub content_id: String,
    pub rating: f64,
}

/// Inclusive rating bounds for the domain (e.g. 1-5 stars).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingScale {
    pub min: f64,
    pub max: f64,
}

impl RatingScale {
    pub fn new(min: f64, max: f64) -> RatingResult<Self> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(RatingError::Config(format!(
                "invalid rating scale [{min}, {max}]"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

impl Default for RatingScale {
    fn default() -> Self {
        Self { min: 1.0, max: 5.0 }
    }
}

/// Numeric sort key of an identifier. Ids are numeric strings and order by
/// their integer value, never lexicographically ("10" sorts after "9").
pub fn numeric_key(id: &str) -> RatingResult<i64> {
    id.trim().parse::<i64>().map_err(|_| {
        RatingError::MalformedRecord(format!("identifier {id:?} is not an integer"))
    })
}

/// Sort identifiers ascending by numeric value.
pub fn sorted_numeric(ids: Vec<String>) -> RatingResult<Vec<String>> {
    let mut keyed = ids
        .into_iter()
        .map(|id| numeric_key(&id).map(|key| (key, id)))
        .collect::<RatingResult<Vec<_>>>()?;
    keyed.sort_by_key(|(key, _)| *key);
    Ok(keyed.into_iter().map(|(_, id)| id).collect())
}

/// The active user and content identifier sets for one run. Defines the shape
/// of every dense matrix produced downstream. The content set is fixed at
/// construction; the user set grows only through [`Cohort::with_users_added`].
#[derive(Debug, Clone)]
pub struct Cohort {
    users: Vec<String>,
    contents: Vec<String>,
    user_set: HashSet<String>,
    content_set: HashSet<String>,
}

impl Cohort {
    /// Build a cohort from (possibly duplicated, unordered) identifier lists.
    pub fn new(users: Vec<String>, contents: Vec<String>) -> RatingResult<Self> {
        let users = dedup_sorted(users)?;
        let contents = dedup_sorted(contents)?;
        let user_set = users.iter().cloned().collect();
        let content_set = contents.iter().cloned().collect();
        Ok(Self {
            users,
            contents,
            user_set,
            content_set,
        })
    }

    pub fn users(&self) -> &[String] {
        &self.users
    }

    pub fn contents(&self) -> &[String] {
        &self.contents
    }

    pub fn contains_user(&self, user_id: &str) -> bool {
        self.user_set.contains(user_id)
    }

    pub fn contains_content(&self, content_id: &str) -> bool {
        self.content_set.contains(content_id)
    }

    /// A new cohort with the given users merged in and the full user set
    /// re-sorted numerically. The content set is carried over unchanged.
    pub fn with_users_added(&self, added: &[String]) -> RatingResult<Self> {
        let mut users = self.users.clone();
        users.extend(added.iter().cloned());
        let users = dedup_sorted(users)?;
        let user_set = users.iter().cloned().collect();
        Ok(Self {
            users,
            contents: self.contents.clone(),
            user_set,
            content_set: self.content_set.clone(),
        })
    }
}

fn dedup_sorted(ids: Vec<String>) -> RatingResult<Vec<String>> {
    let mut seen = HashSet::new();
    let distinct: Vec<String> = ids.into_iter().filter(|id| seen.insert(id.clone())).collect();
    sorted_numeric(distinct)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ordering_not_lexicographic() {
        let ids = vec!["10".to_string(), "9".to_string(), "100".to_string()];
        let sorted = sorted_numeric(ids).unwrap();
        assert_eq!(sorted, vec!["9", "10", "100"]);
    }

    #[test]
    fn non_numeric_id_is_malformed() {
        let err = numeric_key("abc").unwrap_err();
        assert!(matches!(err, RatingError::MalformedRecord(_)));
    }

    #[test]
    fn cohort_dedups_and_sorts() {
        let cohort = Cohort::new(
            vec!["2".into(), "10".into(), "2".into(), "1".into()],
            vec!["7".into(), "3".into(), "7".into()],
        )
        .unwrap();
        assert_eq!(cohort.users(), ["1", "2", "10"]);
        assert_eq!(cohort.contents(), ["3", "7"]);
        assert!(cohort.contains_user("10"));
        assert!(!cohort.contains_user("11"));
    }

    #[test]
    fn adding_users_keeps_contents_and_resorts() {
        let cohort = Cohort::new(vec!["1".into(), "3".into()], vec!["5".into()]).unwrap();
        let extended = cohort.with_users_added(&["2".to_string()]).unwrap();
        assert_eq!(extended.users(), ["1", "2", "3"]);
        assert_eq!(extended.contents(), ["5"]);
        // original untouched
        assert_eq!(cohort.users(), ["1", "3"]);
    }

    #[test]
    fn scale_clamps_estimates() {
        let scale = RatingScale::default();
        assert_eq!(scale.clamp(7.2), 5.0);
        assert_eq!(scale.clamp(0.3), 1.0);
        assert_eq!(scale.clamp(3.4), 3.4);
    }

    #[test]
    fn degenerate_scale_rejected() {
        assert!(RatingScale::new(5.0, 1.0).is_err());
    }
}
