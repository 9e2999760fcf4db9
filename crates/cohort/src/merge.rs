use std::collections::HashSet;

use rating_core::{Cohort, Interaction, RatingResult};
use tracing::debug;

/// Fold the admitted users' qualifying interactions into the working list and
/// extend the cohort's user set.
///
/// A batch interaction qualifies when its user is admitted and its content is
/// already in the cohort; interactions referencing unknown content are
/// silently dropped (the content set never grows). The returned cohort has
/// the admitted users merged in and the full user set re-sorted numerically.
pub fn merge_admitted(
    working: Vec<Interaction>,
    batch: &[Interaction],
    admitted: &[String],
    cohort: &Cohort,
) -> RatingResult<(Vec<Interaction>, Cohort)> {
    let admitted_set: HashSet<&str> = admitted.iter().map(String::as_str).collect();

    let mut merged = working;
    let before = merged.len();
    for interaction in batch {
        if admitted_set.contains(interaction.user_id.as_str())
            && cohort.contains_content(&interaction.content_id)
        {
            merged.push(interaction.clone());
        }
    }

    let extended = cohort.with_users_added(admitted)?;
    debug!(
        appended = merged.len() - before,
        admitted = admitted.len(),
        users = extended.users().len(),
        "Admitted interactions merged into working set"
    );
    Ok((merged, extended))
}
