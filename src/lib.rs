pub mod catalog;
pub mod coach;
pub mod commands;
pub mod config;
pub mod db;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod muscle;
pub mod prediction;
pub mod progression;
pub mod review;
pub mod stagnation;
pub mod stats;

#[cfg(test)]
mod test_utils;

pub use coach::{analyze_training_patterns, Insight, RiskLevel};
pub use commands::analysis::{build_report, TrainingReport};
pub use config::{Config, ConfigError};
pub use db::{AppState, Snapshot, Storage, StorageError};
pub use models::{Exercise, LoggedSet, NewExercise, NewLoggedSet, NewTrainingCycle, TrainingCycle};
pub use muscle::{muscle_analytics, transformation_tier, MuscleStimulus, TransformationTier};
pub use prediction::{predict_strength, StrengthPrediction};
pub use progression::{progression_status, ProgressionResult};
pub use stagnation::{detect_stagnation, StagnationStatus};
pub use stats::{calculate_user_stats, UserStats};

/// Load config, open storage and print a JSON training report to stdout
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();

  let config = Config::from_env()?;
  logging::init_tracing(&config.log_filter);

  tracing::info!("Starting lift-log v{}", env!("CARGO_PKG_VERSION"));

  let storage = Storage::open(&config.database_path).await?;
  let state = AppState { storage };

  let report = build_report(&state, config.today()).await?;
  println!("{}", serde_json::to_string_pretty(&report)?);

  state.storage.close().await;
  Ok(())
}
