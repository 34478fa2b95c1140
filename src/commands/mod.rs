pub mod analysis;
pub mod progression;

use crate::catalog::{find_template, templates_for, ExerciseTemplate};
use crate::db::{AppState, Snapshot};
use crate::models::{Exercise, LoggedSet, NewExercise, NewLoggedSet, NewTrainingCycle, TrainingCycle};
use crate::muscle::Category;

/// Read everything once for a command. Errors are stringified for callers.
pub(crate) async fn snapshot(state: &AppState) -> Result<Snapshot, String> {
  state
    .storage
    .load_snapshot()
    .await
    .map_err(|e| format!("Failed to load training history: {}", e))
}

pub async fn get_exercises(state: &AppState) -> Result<Vec<Exercise>, String> {
  state
    .storage
    .list_exercises()
    .await
    .map_err(|e| format!("Failed to fetch exercises: {}", e))
}

pub async fn add_exercise(state: &AppState, exercise: NewExercise) -> Result<Exercise, String> {
  let id = state
    .storage
    .add_exercise(&exercise)
    .await
    .map_err(|e| format!("Failed to add exercise: {}", e))?;

  state
    .storage
    .get_exercise(id)
    .await
    .map_err(|e| format!("Failed to fetch exercise: {}", e))
}

/// Built-in exercises for one muscle group
pub fn get_exercise_library(category: Category) -> Vec<&'static ExerciseTemplate> {
  templates_for(category)
}

/// Add a library exercise by name, scheduled on `day_of_week`
pub async fn add_exercise_from_template(
  state: &AppState,
  name: &str,
  day_of_week: &str,
) -> Result<Exercise, String> {
  let template =
    find_template(name).ok_or_else(|| format!("Failed to add exercise: unknown template {}", name.trim()))?;

  add_exercise(state, template.to_new_exercise(day_of_week)).await
}

pub async fn update_exercise(state: &AppState, exercise: Exercise) -> Result<(), String> {
  state
    .storage
    .update_exercise(&exercise)
    .await
    .map_err(|e| format!("Failed to update exercise: {}", e))
}

pub async fn delete_exercise(state: &AppState, exercise_id: i64) -> Result<(), String> {
  state
    .storage
    .delete_exercise(exercise_id)
    .await
    .map_err(|e| format!("Failed to delete exercise: {}", e))
}

pub async fn import_default_exercises(state: &AppState) -> Result<Vec<Exercise>, String> {
  state
    .storage
    .import_default_exercises()
    .await
    .map_err(|e| format!("Failed to import default exercises: {}", e))?;

  get_exercises(state).await
}

pub async fn log_set(state: &AppState, set: NewLoggedSet) -> Result<i64, String> {
  state
    .storage
    .log_set(&set)
    .await
    .map_err(|e| format!("Failed to log set: {}", e))
}

pub async fn delete_set(state: &AppState, set_id: i64) -> Result<(), String> {
  state
    .storage
    .delete_set(set_id)
    .await
    .map_err(|e| format!("Failed to delete set: {}", e))
}

pub async fn get_sets_for_exercise(state: &AppState, exercise_id: i64) -> Result<Vec<LoggedSet>, String> {
  state
    .storage
    .sets_for_exercise(exercise_id)
    .await
    .map_err(|e| format!("Failed to fetch sets: {}", e))
}

pub async fn get_cycles(state: &AppState) -> Result<Vec<TrainingCycle>, String> {
  state
    .storage
    .list_cycles()
    .await
    .map_err(|e| format!("Failed to fetch cycles: {}", e))
}

pub async fn start_new_cycle(state: &AppState, cycle: NewTrainingCycle) -> Result<TrainingCycle, String> {
  state
    .storage
    .start_cycle(&cycle)
    .await
    .map_err(|e| format!("Failed to start cycle: {}", e))?;

  state
    .storage
    .active_cycle()
    .await
    .map_err(|e| format!("Failed to fetch active cycle: {}", e))?
    .ok_or_else(|| "Failed to fetch active cycle: none active".to_string())
}
