use chrono::{DateTime, Utc};
use rating_cohort::{build_cohort, merge_admitted, select_new_users};
use rating_core::{PipelineConfig, RatingResult};
use rating_matrix::{RatingSurface, TripleTable};
use rating_similarity::ModelTrainer;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::io;
use crate::predict::complete_surface;

/// Summary of one pipeline invocation.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub base_interactions: usize,
    pub batch_interactions: usize,
    pub admitted_users: Vec<String>,
    pub users: usize,
    pub contents: usize,
    pub known_cells: usize,
    pub predicted_cells: usize,
    pub unestimable_cells: usize,
}

/// Run the whole pipeline once: parse, build the cohort, admit and merge new
/// users, materialize the matrix, train, predict, and write both surfaces.
pub fn run<T: ModelTrainer>(config: &PipelineConfig, trainer: &T) -> RatingResult<RunReport> {
    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    config.engine.validate()?;
    let scale = config.engine.scale()?;

    let base = io::read_interactions(&config.base_path)?;
    let cohort = build_cohort(&base)?;
    info!(
        run_id = %run_id,
        base_interactions = base.len(),
        users = cohort.users().len(),
        contents = cohort.contents().len(),
        "Base dataset loaded"
    );

    let batch = io::read_interactions(&config.new_batch_path)?;
    let admitted = select_new_users(
        &batch,
        &cohort,
        config.additional_user_size,
        config.remove_size,
    )?;
    info!(
        batch_interactions = batch.len(),
        admitted = admitted.len(),
        "New-user admission decided"
    );

    let base_interactions = base.len();
    let batch_interactions = batch.len();
    let (working, cohort) = merge_admitted(base, &batch, &admitted, &cohort)?;

    let table = TripleTable::from_interactions(&working);
    let known = RatingSurface::from_triples(&cohort, &table)?;

    let model = trainer.fit(&table, scale)?;
    let prediction = complete_surface(&known, &cohort, &model)?;

    io::write_surface(&config.predicted_out_path, &prediction.predicted_only)?;
    io::write_surface(&config.completed_out_path, &prediction.completed)?;

    let report = RunReport {
        run_id,
        started_at,
        finished_at: Utc::now(),
        base_interactions,
        batch_interactions,
        admitted_users: admitted,
        users: cohort.users().len(),
        contents: cohort.contents().len(),
        known_cells: known.known_count(),
        predicted_cells: prediction.predicted_cells,
        unestimable_cells: prediction.unestimable.len(),
    };
    info!(
        run_id = %report.run_id,
        predicted = report.predicted_cells,
        unestimable = report.unestimable_cells,
        "Run complete"
    );
    Ok(report)
}
