//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Mock data factories
//! - Helper assertions

use chrono::NaiveDate;

use crate::db::Storage;
use crate::models::{Exercise, LoggedSet, NewExercise, NewLoggedSet, NewTrainingCycle, TrainingCycle};

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite storage for testing
/// Runs all migrations and returns a ready-to-use handle
pub async fn setup_test_db() -> Storage {
  Storage::in_memory()
    .await
    .expect("Failed to create in-memory database")
}

/// Close a test storage handle
pub async fn teardown_test_db(storage: Storage) {
  storage.close().await;
}

/// Log one set per (weight, reps) pair for an exercise on `day`
/// Returns the IDs of created sets
pub async fn seed_test_sets(
  storage: &Storage,
  exercise_id: i64,
  sets: &[(&str, &str)],
  day: NaiveDate,
) -> Vec<i64> {
  let mut ids = Vec::new();

  for (weight, reps) in sets {
    let id = storage
      .log_set(&NewLoggedSet::on(exercise_id, weight, reps, day))
      .await
      .expect("Failed to insert test set");
    ids.push(id);
  }

  ids
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// A set with default quality and no cycle
pub fn mock_set(id: i64, exercise_id: i64, weight: &str, reps: &str, date: &str) -> LoggedSet {
  LoggedSet {
    id,
    exercise_id,
    weight: weight.to_string(),
    reps: reps.to_string(),
    date: date.to_string(),
    cycle_id: 0,
    technique: None,
    quality: 5,
  }
}

/// An exercise on a "4x8-12" scheme
pub fn mock_exercise(id: i64, name: &str, target: &str, category: &str) -> Exercise {
  Exercise {
    id,
    name: name.to_string(),
    target: target.to_string(),
    category: category.to_string(),
    scheme: "4x8-12".to_string(),
    day_of_week: "Monday".to_string(),
    image_uri: None,
    cycle_id: 0,
  }
}

pub fn mock_cycle(id: i64, is_active: bool) -> TrainingCycle {
  TrainingCycle {
    id,
    name: format!("Cycle {}", id),
    start_date: "01/01".to_string(),
    end_date: if is_active { None } else { Some("01/02".to_string()) },
    is_active,
    note: None,
  }
}

/// Insertable exercise; an empty category asks storage to guess
pub fn new_exercise(name: &str, target: &str, category: &str) -> NewExercise {
  NewExercise {
    name: name.to_string(),
    target: target.to_string(),
    category: category.to_string(),
    scheme: "4x8-12".to_string(),
    day_of_week: "Monday".to_string(),
    image_uri: None,
    cycle_id: None,
  }
}

pub fn new_cycle(name: &str, start_date: &str) -> NewTrainingCycle {
  NewTrainingCycle {
    name: name.to_string(),
    start_date: start_date.to_string(),
    note: None,
  }
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let storage = setup_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('exercises', 'logged_sets', 'training_cycles')"
    )
    .fetch_all(storage.pool())
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 3, "Expected 3 tables, got {}", tables.len());

    teardown_test_db(storage).await;
  }

  #[tokio::test]
  async fn test_seed_sets_returns_correct_count() {
    let storage = setup_test_db().await;
    let exercise = storage
      .add_exercise(&new_exercise("Squat", "Legs", ""))
      .await
      .unwrap();

    let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
    let ids = seed_test_sets(&storage, exercise, &[("100", "5"), ("105", "3")], day).await;
    assert_eq!(ids.len(), 2);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM logged_sets")
      .fetch_one(storage.pool())
      .await
      .expect("Failed to count sets");
    assert_eq!(count, 2);

    teardown_test_db(storage).await;
  }

  #[test]
  fn test_mock_factories_create_valid_data() {
    let set = mock_set(1, 2, "60", "8", "05/03");
    assert_eq!(set.exercise_id, 2);
    assert_eq!(set.quality, 5);

    let exercise = mock_exercise(3, "Curl", "Biceps", "Arms");
    assert_eq!(exercise.scheme, "4x8-12");

    assert_eq!(mock_cycle(1, true).end_date, None);
    assert!(mock_cycle(2, false).end_date.is_some());
  }
}
