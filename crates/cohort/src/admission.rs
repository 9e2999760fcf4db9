use std::collections::hash_map::Entry;
use std::collections::HashMap;

use rating_core::types::sorted_numeric;
use rating_core::{Cohort, Interaction, RatingResult};
use tracing::debug;

/// Choose which brand-new users are admitted into the cohort.
///
/// Candidates are ranked by how many of their batch interactions touch content
/// already in the cohort (engagement with known content as a proxy for data
/// quality). Among equal counts the tie order is the order in which distinct
/// users first appeared while scanning the batch top to bottom.
///
/// The first `remove_size` ranked entries are discarded unconditionally, even
/// when they would otherwise qualify. From the remainder, users not already in
/// the cohort are admitted until `additional_user_size` is reached or the
/// ranked list is exhausted.
///
/// Returns the admitted user ids sorted ascending by numeric value.
pub fn select_new_users(
    batch: &[Interaction],
    cohort: &Cohort,
    additional_user_size: usize,
    remove_size: usize,
) -> RatingResult<Vec<String>> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut first_seen: Vec<String> = Vec::new();
    for interaction in batch {
        if !cohort.contains_content(&interaction.content_id) {
            continue;
        }
        match counts.entry(interaction.user_id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(1);
                first_seen.push(interaction.user_id.clone());
            }
            Entry::Occupied(mut slot) => *slot.get_mut() += 1,
        }
    }

    // Stable sort keeps first-seen order among equal counts.
    let mut ranked: Vec<(String, usize)> = first_seen
        .into_iter()
        .map(|user| {
            let count = counts[&user];
            (user, count)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let mut admitted = Vec::new();
    for (rank, (user, _count)) in ranked.into_iter().enumerate() {
        // The skip window discards ranked entries unconditionally, cohort
        // members included.
        if rank < remove_size {
            continue;
        }
        if cohort.contains_user(&user) {
            continue;
        }
        if admitted.len() >= additional_user_size {
            break;
        }
        admitted.push(user);
    }

    debug!(
        admitted = admitted.len(),
        quota = additional_user_size,
        skipped = remove_size,
        "New-user admission complete"
    );
    sorted_numeric(admitted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interaction(id: &str, user: &str, content: &str) -> Interaction {
        Interaction {
            interaction_id: id.to_string(),
            user_id: user.to_string(),
            content_id: content.to_string(),
            rating: 3.0,
        }
    }

    fn cohort(users: &[&str], contents: &[&str]) -> Cohort {
        Cohort::new(
            users.iter().map(|s| s.to_string()).collect(),
            contents.iter().map(|s| s.to_string()).collect(),
        )
        .unwrap()
    }

    /// Engagement counts {100:5, 200:5, 300:3}, user 100 first-seen before
    /// user 200.
    fn tied_batch() -> Vec<Interaction> {
        let mut batch = Vec::new();
        let mut id = 0;
        for _ in 0..5 {
            id += 1;
            batch.push(interaction(&id.to_string(), "100", "1"));
            id += 1;
            batch.push(interaction(&id.to_string(), "200", "1"));
        }
        for _ in 0..3 {
            id += 1;
            batch.push(interaction(&id.to_string(), "300", "1"));
        }
        batch
    }

    #[test]
    fn tie_break_is_first_seen_order() {
        let cohort = cohort(&["1"], &["1"]);
        let admitted = select_new_users(&tied_batch(), &cohort, 1, 0).unwrap();
        assert_eq!(admitted, ["100"]);
    }

    #[test]
    fn skip_window_shifts_past_tied_leader() {
        let cohort = cohort(&["1"], &["1"]);
        let admitted = select_new_users(&tied_batch(), &cohort, 1, 1).unwrap();
        assert_eq!(admitted, ["200"]);
    }

    #[test]
    fn never_admits_existing_user() {
        let cohort = cohort(&["100"], &["1"]);
        let admitted = select_new_users(&tied_batch(), &cohort, 2, 0).unwrap();
        assert_eq!(admitted, ["200", "300"]);
    }

    #[test]
    fn skip_window_counts_known_users() {
        // User 100 is already in the cohort yet still occupies rank 0, so a
        // skip of 1 discards it rather than a fresh candidate.
        let cohort = cohort(&["100"], &["1"]);
        let admitted = select_new_users(&tied_batch(), &cohort, 2, 1).unwrap();
        assert_eq!(admitted, ["200", "300"]);
    }

    #[test]
    fn skip_exceeding_candidates_admits_nobody() {
        let cohort = cohort(&["1"], &["1"]);
        let admitted = select_new_users(&tied_batch(), &cohort, 5, 3).unwrap();
        assert!(admitted.is_empty());
    }

    #[test]
    fn quota_exceeding_supply_admits_all_remaining() {
        let cohort = cohort(&["1"], &["1"]);
        let admitted = select_new_users(&tied_batch(), &cohort, 10, 0).unwrap();
        assert_eq!(admitted, ["100", "200", "300"]);
    }

    #[test]
    fn unknown_content_does_not_contribute() {
        let cohort = cohort(&["1"], &["1"]);
        let batch = vec![
            interaction("1", "100", "99"),
            interaction("2", "100", "99"),
            interaction("3", "200", "1"),
        ];
        // 100 engaged twice but only with unknown content; 200 outranks it.
        let admitted = select_new_users(&batch, &cohort, 1, 0).unwrap();
        assert_eq!(admitted, ["200"]);
    }

    #[test]
    fn output_is_numerically_sorted() {
        let cohort = cohort(&["1"], &["1"]);
        let batch = vec![
            interaction("1", "10", "1"),
            interaction("2", "9", "1"),
            interaction("3", "9", "1"),
        ];
        let admitted = select_new_users(&batch, &cohort, 5, 0).unwrap();
        assert_eq!(admitted, ["9", "10"]);
    }
}
