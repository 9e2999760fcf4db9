//! The delimited-tabular boundary: interaction sources and surface sinks.

use std::path::Path;

use rating_core::types::numeric_key;
use rating_core::{Interaction, RatingError, RatingResult};
use rating_matrix::RatingSurface;
use tracing::debug;

/// Read interactions from a CSV source. The header row is discarded; columns
/// are positional: `(interaction_id, user_id, content_id, rating)`. Any
/// unparseable field aborts the read with `MalformedRecord`.
pub fn read_interactions(path: &Path) -> RatingResult<Vec<Interaction>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;

    let mut interactions = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        // header occupies line 1
        interactions.push(parse_record(&record, index + 2)?);
    }
    debug!(path = %path.display(), records = interactions.len(), "Interaction source read");
    Ok(interactions)
}

fn parse_record(record: &csv::StringRecord, line: usize) -> RatingResult<Interaction> {
    let field = |idx: usize, name: &str| {
        record.get(idx).ok_or_else(|| {
            RatingError::MalformedRecord(format!("line {line}: missing {name} column"))
        })
    };

    let interaction_id = field(0, "interaction id")?.trim().to_string();
    let user_id = field(1, "user id")?.trim().to_string();
    let content_id = field(2, "content id")?.trim().to_string();
    let rating_raw = field(3, "rating")?;

    numeric_key(&user_id).map_err(|_| {
        RatingError::MalformedRecord(format!("line {line}: user id {user_id:?} is not an integer"))
    })?;
    numeric_key(&content_id).map_err(|_| {
        RatingError::MalformedRecord(format!(
            "line {line}: content id {content_id:?} is not an integer"
        ))
    })?;
    let rating: f64 = rating_raw.trim().parse().map_err(|_| {
        RatingError::MalformedRecord(format!("line {line}: rating {rating_raw:?} is not numeric"))
    })?;

    Ok(Interaction {
        interaction_id,
        user_id,
        content_id,
        rating,
    })
}

/// Write a surface as CSV: header row is the content ids behind an empty
/// leading field, then one row per user with the user id in the first column.
/// Absent cells render as empty fields.
pub fn write_surface(path: &Path, surface: &RatingSurface) -> RatingResult<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = Vec::with_capacity(surface.contents().len() + 1);
    header.push(String::new());
    header.extend(surface.contents().iter().cloned());
    writer.write_record(&header)?;

    for (u, user) in surface.users().iter().enumerate() {
        let mut row = Vec::with_capacity(surface.contents().len() + 1);
        row.push(user.clone());
        for c in 0..surface.contents().len() {
            row.push(match surface.value_at(u, c) {
                Some(value) => value.to_string(),
                None => String::new(),
            });
        }
        writer.write_record(&row)?;
    }
    writer.flush()?;
    debug!(path = %path.display(), rows = surface.users().len(), "Surface written");
    Ok(())
}
