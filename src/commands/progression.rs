//! Per-exercise commands: overload readiness, plateau check, ghost session

use chrono::NaiveDate;
use serde::Serialize;

use crate::db::AppState;
use crate::models::{Exercise, LoggedSet};
use crate::prediction::{predict_strength, StrengthPrediction};
use crate::progression::{progression_status, ProgressionResult};
use crate::review::{
    evolution_series, ghost_session, personal_record, weekly_groups, EvolutionPoint, GhostSession, WeekGroup,
};
use crate::stagnation::{detect_stagnation, StagnationStatus};

/// Everything the detail screen shows for one exercise
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseReport {
    pub exercise: Exercise,
    pub progression: ProgressionResult,
    pub stagnation: StagnationStatus,
    pub prediction: Option<StrengthPrediction>,
    pub ghost: Option<GhostSession>,
    pub personal_record: f64,
    /// Per-set chart data, oldest first
    pub evolution: Vec<EvolutionPoint>,
    pub latest: Option<EvolutionPoint>,
    pub weeks: Vec<WeekGroup>,
}

/// `sets` must already be filtered to this exercise
pub fn exercise_report(exercise: &Exercise, sets: &[LoggedSet], as_of: NaiveDate) -> ExerciseReport {
    let evolution = evolution_series(sets);
    ExerciseReport {
        exercise: exercise.clone(),
        progression: progression_status(&exercise.scheme, sets),
        stagnation: detect_stagnation(sets),
        prediction: predict_strength(&exercise.name, sets),
        ghost: ghost_session(&exercise.scheme, sets, as_of),
        personal_record: personal_record(sets),
        latest: evolution.last().cloned(),
        evolution,
        weeks: weekly_groups(sets, as_of),
    }
}

async fn exercise_with_sets(state: &AppState, exercise_id: i64) -> Result<(Exercise, Vec<LoggedSet>), String> {
    let exercise = state
        .storage
        .get_exercise(exercise_id)
        .await
        .map_err(|e| format!("Failed to fetch exercise: {}", e))?;

    let sets = state
        .storage
        .sets_for_exercise(exercise_id)
        .await
        .map_err(|e| format!("Failed to fetch sets: {}", e))?;

    Ok((exercise, sets))
}

/// Is the lifter ready to add load on this exercise?
pub async fn get_progression_status(state: &AppState, exercise_id: i64) -> Result<ProgressionResult, String> {
    let (exercise, sets) = exercise_with_sets(state, exercise_id).await?;
    Ok(progression_status(&exercise.scheme, &sets))
}

pub async fn get_stagnation(state: &AppState, exercise_id: i64) -> Result<StagnationStatus, String> {
    let (_, sets) = exercise_with_sets(state, exercise_id).await?;
    Ok(detect_stagnation(&sets))
}

pub async fn get_strength_prediction(
    state: &AppState,
    exercise_id: i64,
) -> Result<Option<StrengthPrediction>, String> {
    let (exercise, sets) = exercise_with_sets(state, exercise_id).await?;
    Ok(predict_strength(&exercise.name, &sets))
}

pub async fn get_ghost_session(
    state: &AppState,
    exercise_id: i64,
    as_of: NaiveDate,
) -> Result<Option<GhostSession>, String> {
    let (exercise, sets) = exercise_with_sets(state, exercise_id).await?;
    Ok(ghost_session(&exercise.scheme, &sets, as_of))
}

pub async fn get_evolution(state: &AppState, exercise_id: i64) -> Result<Vec<EvolutionPoint>, String> {
    let (_, sets) = exercise_with_sets(state, exercise_id).await?;
    Ok(evolution_series(&sets))
}

pub async fn get_weekly_groups(
    state: &AppState,
    exercise_id: i64,
    as_of: NaiveDate,
) -> Result<Vec<WeekGroup>, String> {
    let (_, sets) = exercise_with_sets(state, exercise_id).await?;
    Ok(weekly_groups(&sets, as_of))
}

pub async fn get_exercise_report(
    state: &AppState,
    exercise_id: i64,
    as_of: NaiveDate,
) -> Result<ExerciseReport, String> {
    let (exercise, sets) = exercise_with_sets(state, exercise_id).await?;
    Ok(exercise_report(&exercise, &sets, as_of))
}
