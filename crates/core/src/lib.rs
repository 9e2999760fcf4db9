pub mod config;
pub mod error;
pub mod types;

pub use config::{EngineConfig, PipelineConfig};
pub use error::{RatingError, RatingResult};
pub use types::{Cohort, Interaction, RatingScale};
