use serde::Deserialize;
use std::path::PathBuf;

use crate::error::{RatingError, RatingResult};
use crate::types::RatingScale;

/// One invocation of the pipeline. All fields are required and come from the
/// process arguments; there is no hidden global state.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Base interaction dataset (CSV).
    pub base_path: PathBuf,
    /// Newly observed interaction batch (CSV).
    pub new_batch_path: PathBuf,
    /// Output sink for the predicted-only surface.
    pub predicted_out_path: PathBuf,
    /// Output sink for the completed surface.
    pub completed_out_path: PathBuf,
    /// Admission quota: how many new users may join the cohort.
    pub additional_user_size: usize,
    /// Skip window: ranked candidates discarded from the top, unconditionally.
    pub remove_size: usize,
    /// Similarity engine tuning.
    pub engine: EngineConfig,
}

/// Similarity engine tuning. Loaded from environment variables with the
/// prefix `RATING_REFRESH__` and overridable from the CLI.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Neighborhood size for the KNN model.
    #[serde(default = "default_neighbors")]
    pub neighbors: usize,
    /// Minimum number of co-rated contents for a user pair to count as neighbors.
    #[serde(default = "default_min_support")]
    pub min_support: usize,
    #[serde(default = "default_scale_min")]
    pub scale_min: f64,
    #[serde(default = "default_scale_max")]
    pub scale_max: f64,
}

fn default_neighbors() -> usize {
    40
}
fn default_min_support() -> usize {
    1
}
fn default_scale_min() -> f64 {
    1.0
}
fn default_scale_max() -> f64 {
    5.0
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            neighbors: default_neighbors(),
            min_support: default_min_support(),
            scale_min: default_scale_min(),
            scale_max: default_scale_max(),
        }
    }
}

impl EngineConfig {
    /// Load engine tuning from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("RATING_REFRESH")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    pub fn scale(&self) -> RatingResult<RatingScale> {
        RatingScale::new(self.scale_min, self.scale_max)
    }

    pub fn validate(&self) -> RatingResult<()> {
        if self.neighbors == 0 {
            return Err(RatingError::Config(
                "neighbors must be at least 1".to_string(),
            ));
        }
        self.scale()?;
        Ok(())
    }
}
