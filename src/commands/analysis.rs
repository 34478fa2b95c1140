use chrono::NaiveDate;
use serde::Serialize;

use super::progression::{exercise_report, ExerciseReport};
use super::snapshot;
use crate::coach::{analyze_training_patterns, Insight};
use crate::db::AppState;
use crate::muscle::{muscle_analytics, transformation_tier, MuscleStimulus, TransformationTier};
use crate::prediction::{predict_strength, StrengthPrediction};
use crate::review::{
  consistency_log, exercise_volumes, monthly_comparison, power_radar, ExerciseVolume, MonthlyComparison,
  PowerRadar,
};
use crate::stats::{calculate_user_stats, UserStats};

/// ---------------------------------------------------------------------------
/// Dashboard Commands
/// ---------------------------------------------------------------------------

pub async fn get_user_stats(state: &AppState) -> Result<UserStats, String> {
  let data = snapshot(state).await?;
  Ok(calculate_user_stats(&data.exercises, &data.sets, &data.cycles))
}

pub async fn get_insights(state: &AppState) -> Result<Vec<Insight>, String> {
  let data = snapshot(state).await?;
  Ok(analyze_training_patterns(&data.exercises, &data.sets))
}

pub async fn get_muscle_analytics(state: &AppState, as_of: NaiveDate) -> Result<Vec<MuscleStimulus>, String> {
  let data = snapshot(state).await?;
  Ok(muscle_analytics(&data.exercises, &data.sets, as_of))
}

/// Tier plus its display copy
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformationStatus {
  pub tier: TransformationTier,
  pub label: String,
  pub description: String,
}

impl From<TransformationTier> for TransformationStatus {
  fn from(tier: TransformationTier) -> Self {
    Self {
      tier,
      label: tier.label().to_string(),
      description: tier.description().to_string(),
    }
  }
}

pub async fn get_transformation(state: &AppState) -> Result<TransformationStatus, String> {
  let data = snapshot(state).await?;
  Ok(transformation_tier(&data.sets).into())
}

/// Forecasts for every exercise that has an upward trend, in exercise order
pub async fn get_strength_predictions(state: &AppState) -> Result<Vec<StrengthPrediction>, String> {
  let data = snapshot(state).await?;

  Ok(
    data
      .exercises
      .iter()
      .filter_map(|e| predict_strength(&e.name, &data.sets_for(e.id)))
      .collect(),
  )
}

/// ---------------------------------------------------------------------------
/// Review Hub Commands
/// ---------------------------------------------------------------------------

pub async fn get_power_radar(state: &AppState) -> Result<PowerRadar, String> {
  let data = snapshot(state).await?;
  Ok(power_radar(&data.sets))
}

pub async fn get_monthly_comparison(state: &AppState, as_of: NaiveDate) -> Result<MonthlyComparison, String> {
  let data = snapshot(state).await?;
  Ok(monthly_comparison(&data.sets, as_of))
}

pub async fn get_consistency_log(state: &AppState) -> Result<Vec<String>, String> {
  let data = snapshot(state).await?;
  Ok(consistency_log(&data.sets))
}

pub async fn get_volume_ranking(state: &AppState) -> Result<Vec<ExerciseVolume>, String> {
  let data = snapshot(state).await?;
  Ok(exercise_volumes(&data.exercises, &data.sets))
}

/// ---------------------------------------------------------------------------
/// Full Report
/// ---------------------------------------------------------------------------

/// Every analytic over one snapshot
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
  pub as_of: NaiveDate,
  pub stats: UserStats,
  pub transformation: TransformationStatus,
  pub muscles: Vec<MuscleStimulus>,
  pub insights: Vec<Insight>,
  pub power_radar: PowerRadar,
  pub monthly: MonthlyComparison,
  pub consistency_log: Vec<String>,
  pub volume_ranking: Vec<ExerciseVolume>,
  pub exercises: Vec<ExerciseReport>,
}

pub async fn build_report(state: &AppState, as_of: NaiveDate) -> Result<TrainingReport, String> {
  let data = snapshot(state).await?;

  let exercises = data
    .exercises
    .iter()
    .map(|e| exercise_report(e, &data.sets_for(e.id), as_of))
    .collect();

  let report = TrainingReport {
    as_of,
    stats: calculate_user_stats(&data.exercises, &data.sets, &data.cycles),
    transformation: transformation_tier(&data.sets).into(),
    muscles: muscle_analytics(&data.exercises, &data.sets, as_of),
    insights: analyze_training_patterns(&data.exercises, &data.sets),
    power_radar: power_radar(&data.sets),
    monthly: monthly_comparison(&data.sets, as_of),
    consistency_log: consistency_log(&data.sets),
    volume_ranking: exercise_volumes(&data.exercises, &data.sets),
    exercises,
  };

  tracing::info!(
    %as_of,
    exercises = report.exercises.len(),
    insights = report.insights.len(),
    level = report.stats.level,
    "Built training report"
  );

  Ok(report)
}
