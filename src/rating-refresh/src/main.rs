//! Rating Refresh — batch re-training of the user×content rating surface.
//!
//! Reads a base interaction dataset and a new-batch file, admits new users by
//! engagement rank, completes the rating matrix with user-based KNN, and
//! writes the predicted-only and completed surfaces as CSV.

use clap::Parser;
use rating_core::config::{EngineConfig, PipelineConfig};
use rating_similarity::KnnTrainer;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "rating-refresh")]
#[command(about = "Batch user-content rating matrix refresh and completion")]
#[command(version)]
struct Cli {
    /// Base interaction dataset (CSV)
    #[arg(long)]
    base: PathBuf,

    /// Newly observed interaction batch (CSV)
    #[arg(long)]
    new_batch: PathBuf,

    /// Output path for the predicted-only surface
    #[arg(long)]
    predicted_out: PathBuf,

    /// Output path for the completed surface
    #[arg(long)]
    completed_out: PathBuf,

    /// How many new users may be admitted this run
    #[arg(long)]
    additional_user_size: usize,

    /// Ranked candidates discarded from the top before admission
    #[arg(long)]
    remove_size: usize,

    /// KNN neighborhood size (overrides config)
    #[arg(long, env = "RATING_REFRESH__NEIGHBORS")]
    neighbors: Option<usize>,

    /// Minimum co-rated contents for a neighbor pair (overrides config)
    #[arg(long, env = "RATING_REFRESH__MIN_SUPPORT")]
    min_support: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rating_refresh=info,rating_pipeline=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("Rating Refresh starting up");

    // Load engine tuning from the environment
    let mut engine = EngineConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load engine config, using defaults");
        EngineConfig::default()
    });

    // Apply CLI overrides
    if let Some(neighbors) = cli.neighbors {
        engine.neighbors = neighbors;
    }
    if let Some(min_support) = cli.min_support {
        engine.min_support = min_support;
    }

    let config = PipelineConfig {
        base_path: cli.base,
        new_batch_path: cli.new_batch,
        predicted_out_path: cli.predicted_out,
        completed_out_path: cli.completed_out,
        additional_user_size: cli.additional_user_size,
        remove_size: cli.remove_size,
        engine,
    };

    info!(
        base = %config.base_path.display(),
        new_batch = %config.new_batch_path.display(),
        additional_user_size = config.additional_user_size,
        remove_size = config.remove_size,
        neighbors = config.engine.neighbors,
        "Configuration loaded"
    );

    let trainer = KnnTrainer::from_config(&config.engine);
    let report = rating_pipeline::run(&config, &trainer)?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
