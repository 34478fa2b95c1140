use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

use crate::catalog::starter_program;
use crate::models::{Exercise, LoggedSet, NewExercise, NewLoggedSet, NewTrainingCycle, TrainingCycle};
use crate::muscle::guess_category;

pub type DbPool = SqlitePool;

/// Application state holding the storage handle
pub struct AppState {
  pub storage: Storage,
}

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Migration failed: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("Not found: {0}")]
  NotFound(String),
}

impl Serialize for StorageError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// Everything the analytics need, read in one go
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
  pub exercises: Vec<Exercise>,
  pub sets: Vec<LoggedSet>,
  pub cycles: Vec<TrainingCycle>,
}

impl Snapshot {
  /// Sets belonging to one exercise
  pub fn sets_for(&self, exercise_id: i64) -> Vec<LoggedSet> {
    self
      .sets
      .iter()
      .filter(|s| s.exercise_id == exercise_id)
      .cloned()
      .collect()
  }
}

/// ---------------------------------------------------------------------------
/// Storage Handle
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Storage {
  pool: DbPool,
}

impl Storage {
  /// Open (creating if needed) the database file and run migrations
  pub async fn open(path: &Path) -> Result<Self, StorageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
      std::fs::create_dir_all(parent)?;
    }

    tracing::info!(path = %path.display(), "Opening database");

    let options = SqliteConnectOptions::new()
      .filename(path)
      .create_if_missing(true)
      .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
      .max_connections(5)
      .connect_with(options)
      .await?;

    Self::migrate(pool).await
  }

  /// Private in-memory database
  ///
  /// Uses max_connections(1) and no idle reaping: every pooled connection to
  /// ":memory:" is its own database.
  pub async fn in_memory() -> Result<Self, StorageError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
      .max_connections(1)
      .idle_timeout(None)
      .max_lifetime(None)
      .connect_with(options)
      .await?;

    Self::migrate(pool).await
  }

  async fn migrate(pool: DbPool) -> Result<Self, StorageError> {
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::debug!("Database migrations applied");
    Ok(Self { pool })
  }

  pub fn pool(&self) -> &DbPool {
    &self.pool
  }

  pub async fn close(&self) {
    self.pool.close().await;
  }

  /// -------------------------------------------------------------------------
  /// Exercises
  /// -------------------------------------------------------------------------

  pub async fn list_exercises(&self) -> Result<Vec<Exercise>, StorageError> {
    let exercises = sqlx::query_as::<_, Exercise>(
      r#"
      SELECT id, name, target, category, scheme, day_of_week, image_uri, cycle_id
      FROM exercises
      ORDER BY id
      "#,
    )
    .fetch_all(&self.pool)
    .await?;

    Ok(exercises)
  }

  pub async fn get_exercise(&self, id: i64) -> Result<Exercise, StorageError> {
    sqlx::query_as::<_, Exercise>(
      r#"
      SELECT id, name, target, category, scheme, day_of_week, image_uri, cycle_id
      FROM exercises
      WHERE id = ?1
      "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?
    .ok_or_else(|| StorageError::NotFound(format!("exercise {}", id)))
  }

  /// Insert an exercise. Without an explicit cycle it joins the active one
  /// (0 when none is active); a blank category is guessed from the target.
  pub async fn add_exercise(&self, exercise: &NewExercise) -> Result<i64, StorageError> {
    let cycle_id = match exercise.cycle_id {
      Some(id) => id,
      None => self.active_cycle_id().await?,
    };

    let category = if exercise.category.trim().is_empty() {
      guess_category(&exercise.target).to_string()
    } else {
      exercise.category.trim().to_string()
    };

    let result = sqlx::query(
      r#"
      INSERT INTO exercises (name, target, category, scheme, day_of_week, image_uri, cycle_id)
      VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
      "#,
    )
    .bind(&exercise.name)
    .bind(&exercise.target)
    .bind(&category)
    .bind(&exercise.scheme)
    .bind(&exercise.day_of_week)
    .bind(&exercise.image_uri)
    .bind(cycle_id)
    .execute(&self.pool)
    .await?;

    let id = result.last_insert_rowid();
    tracing::debug!(id, name = %exercise.name, %category, "Added exercise");
    Ok(id)
  }

  pub async fn update_exercise(&self, exercise: &Exercise) -> Result<(), StorageError> {
    let result = sqlx::query(
      r#"
      UPDATE exercises
      SET name = ?1, target = ?2, category = ?3, scheme = ?4,
          day_of_week = ?5, image_uri = ?6, cycle_id = ?7
      WHERE id = ?8
      "#,
    )
    .bind(&exercise.name)
    .bind(&exercise.target)
    .bind(&exercise.category)
    .bind(&exercise.scheme)
    .bind(&exercise.day_of_week)
    .bind(&exercise.image_uri)
    .bind(exercise.cycle_id)
    .bind(exercise.id)
    .execute(&self.pool)
    .await?;

    if result.rows_affected() == 0 {
      return Err(StorageError::NotFound(format!("exercise {}", exercise.id)));
    }
    Ok(())
  }

  /// Delete an exercise and, through the foreign key, all of its sets
  pub async fn delete_exercise(&self, id: i64) -> Result<(), StorageError> {
    let result = sqlx::query("DELETE FROM exercises WHERE id = ?1")
      .bind(id)
      .execute(&self.pool)
      .await?;

    if result.rows_affected() == 0 {
      return Err(StorageError::NotFound(format!("exercise {}", id)));
    }

    tracing::info!(id, "Deleted exercise");
    Ok(())
  }

  /// Seed the five-day starter program. Returns the new ids.
  pub async fn import_default_exercises(&self) -> Result<Vec<i64>, StorageError> {
    let mut ids = Vec::new();
    for exercise in starter_program() {
      ids.push(self.add_exercise(&exercise).await?);
    }

    tracing::info!(count = ids.len(), "Imported starter program");
    Ok(ids)
  }

  /// -------------------------------------------------------------------------
  /// Logged Sets
  /// -------------------------------------------------------------------------

  pub async fn log_set(&self, set: &NewLoggedSet) -> Result<i64, StorageError> {
    let cycle_id = match set.cycle_id {
      Some(id) => id,
      None => self.active_cycle_id().await?,
    };

    let result = sqlx::query(
      r#"
      INSERT INTO logged_sets (exercise_id, weight, reps, date, cycle_id, technique, quality)
      VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
      "#,
    )
    .bind(set.exercise_id)
    .bind(&set.weight)
    .bind(&set.reps)
    .bind(&set.date)
    .bind(cycle_id)
    .bind(&set.technique)
    // Quality is a 1-5 rating no matter how the record was built
    .bind(set.quality.clamp(1, 5))
    .execute(&self.pool)
    .await?;

    Ok(result.last_insert_rowid())
  }

  pub async fn list_sets(&self) -> Result<Vec<LoggedSet>, StorageError> {
    let sets = sqlx::query_as::<_, LoggedSet>(
      r#"
      SELECT id, exercise_id, weight, reps, date, cycle_id, technique, quality
      FROM logged_sets
      ORDER BY id
      "#,
    )
    .fetch_all(&self.pool)
    .await?;

    Ok(sets)
  }

  pub async fn sets_for_exercise(&self, exercise_id: i64) -> Result<Vec<LoggedSet>, StorageError> {
    let sets = sqlx::query_as::<_, LoggedSet>(
      r#"
      SELECT id, exercise_id, weight, reps, date, cycle_id, technique, quality
      FROM logged_sets
      WHERE exercise_id = ?1
      ORDER BY id
      "#,
    )
    .bind(exercise_id)
    .fetch_all(&self.pool)
    .await?;

    Ok(sets)
  }

  pub async fn delete_set(&self, id: i64) -> Result<(), StorageError> {
    let result = sqlx::query("DELETE FROM logged_sets WHERE id = ?1")
      .bind(id)
      .execute(&self.pool)
      .await?;

    if result.rows_affected() == 0 {
      return Err(StorageError::NotFound(format!("set {}", id)));
    }
    Ok(())
  }

  /// -------------------------------------------------------------------------
  /// Training Cycles
  /// -------------------------------------------------------------------------

  pub async fn list_cycles(&self) -> Result<Vec<TrainingCycle>, StorageError> {
    let cycles = sqlx::query_as::<_, TrainingCycle>(
      r#"
      SELECT id, name, start_date, end_date, is_active, note
      FROM training_cycles
      ORDER BY id
      "#,
    )
    .fetch_all(&self.pool)
    .await?;

    Ok(cycles)
  }

  pub async fn active_cycle(&self) -> Result<Option<TrainingCycle>, StorageError> {
    let cycle = sqlx::query_as::<_, TrainingCycle>(
      r#"
      SELECT id, name, start_date, end_date, is_active, note
      FROM training_cycles
      WHERE is_active = 1
      ORDER BY id DESC
      LIMIT 1
      "#,
    )
    .fetch_optional(&self.pool)
    .await?;

    Ok(cycle)
  }

  async fn active_cycle_id(&self) -> Result<i64, StorageError> {
    Ok(self.active_cycle().await?.map(|c| c.id).unwrap_or(0))
  }

  /// Close whatever cycle is active (ending it on the new start date) and
  /// open a new one. Runs in one transaction.
  pub async fn start_cycle(&self, cycle: &NewTrainingCycle) -> Result<i64, StorageError> {
    let mut tx = self.pool.begin().await?;

    sqlx::query(
      r#"
      UPDATE training_cycles
      SET is_active = 0, end_date = ?1
      WHERE is_active = 1
      "#,
    )
    .bind(&cycle.start_date)
    .execute(&mut *tx)
    .await?;

    let result = sqlx::query(
      r#"
      INSERT INTO training_cycles (name, start_date, end_date, is_active, note)
      VALUES (?1, ?2, NULL, 1, ?3)
      "#,
    )
    .bind(&cycle.name)
    .bind(&cycle.start_date)
    .bind(&cycle.note)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    let id = result.last_insert_rowid();
    tracing::info!(id, name = %cycle.name, "Started training cycle");
    Ok(id)
  }

  /// -------------------------------------------------------------------------
  /// Snapshot
  /// -------------------------------------------------------------------------

  pub async fn load_snapshot(&self) -> Result<Snapshot, StorageError> {
    let snapshot = Snapshot {
      exercises: self.list_exercises().await?,
      sets: self.list_sets().await?,
      cycles: self.list_cycles().await?,
    };

    tracing::debug!(
      exercises = snapshot.exercises.len(),
      sets = snapshot.sets.len(),
      cycles = snapshot.cycles.len(),
      "Loaded snapshot"
    );
    Ok(snapshot)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::*;
  use chrono::NaiveDate;

  fn june(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
  }

  #[tokio::test]
  async fn test_add_and_get_exercise() {
    let storage = setup_test_db().await;

    let id = storage.add_exercise(&new_exercise("Bench Press", "Upper chest", "")).await.unwrap();
    let exercise = storage.get_exercise(id).await.unwrap();

    assert_eq!(exercise.name, "Bench Press");
    assert_eq!(exercise.category, "Chest");
    assert_eq!(exercise.cycle_id, 0);
    assert_eq!(exercise.image_uri, None);

    teardown_test_db(storage).await;
  }

  #[tokio::test]
  async fn test_explicit_category_is_kept() {
    let storage = setup_test_db().await;

    let id = storage.add_exercise(&new_exercise("Dips", "Lower chest", " Arms ")).await.unwrap();
    assert_eq!(storage.get_exercise(id).await.unwrap().category, "Arms");

    teardown_test_db(storage).await;
  }

  #[tokio::test]
  async fn test_missing_exercise_is_not_found() {
    let storage = setup_test_db().await;

    let err = storage.get_exercise(42).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound(_)));
    assert_eq!(err.to_string(), "Not found: exercise 42");

    assert!(matches!(
      storage.delete_exercise(42).await,
      Err(StorageError::NotFound(_))
    ));
    assert!(matches!(storage.delete_set(7).await, Err(StorageError::NotFound(_))));

    teardown_test_db(storage).await;
  }

  #[tokio::test]
  async fn test_update_exercise() {
    let storage = setup_test_db().await;

    let id = storage.add_exercise(&new_exercise("Row", "Back", "")).await.unwrap();
    let mut exercise = storage.get_exercise(id).await.unwrap();
    exercise.scheme = "5x5".to_string();
    exercise.image_uri = Some("row.png".to_string());
    storage.update_exercise(&exercise).await.unwrap();

    assert_eq!(storage.get_exercise(id).await.unwrap(), exercise);

    exercise.id = 999;
    assert!(storage.update_exercise(&exercise).await.is_err());

    teardown_test_db(storage).await;
  }

  #[tokio::test]
  async fn test_delete_exercise_cascades_to_sets() {
    let storage = setup_test_db().await;

    let squat = storage.add_exercise(&new_exercise("Squat", "Quads", "")).await.unwrap();
    let curl = storage.add_exercise(&new_exercise("Curl", "Biceps", "")).await.unwrap();
    seed_test_sets(&storage, squat, &[("100", "5"), ("100", "5")], june(3)).await;
    seed_test_sets(&storage, curl, &[("20", "12")], june(3)).await;

    storage.delete_exercise(squat).await.unwrap();

    let remaining = storage.list_sets().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].exercise_id, curl);

    teardown_test_db(storage).await;
  }

  #[tokio::test]
  async fn test_log_set_round_trips_free_text() {
    let storage = setup_test_db().await;

    let id = storage.add_exercise(&new_exercise("Bench", "Chest", "")).await.unwrap();
    let set = NewLoggedSet::on(id, "62,5", "8", june(4))
      .with_technique("Drop-set")
      .with_quality(9);
    let set_id = storage.log_set(&set).await.unwrap();

    let sets = storage.sets_for_exercise(id).await.unwrap();
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].id, set_id);
    assert_eq!(sets[0].weight, "62,5");
    assert_eq!(sets[0].date, "04/06");
    assert_eq!(sets[0].technique.as_deref(), Some("Drop-set"));
    assert_eq!(sets[0].quality, 5);

    storage.delete_set(set_id).await.unwrap();
    assert!(storage.sets_for_exercise(id).await.unwrap().is_empty());

    teardown_test_db(storage).await;
  }

  #[tokio::test]
  async fn test_log_set_clamps_out_of_range_quality() {
    let storage = setup_test_db().await;

    let id = storage.add_exercise(&new_exercise("Bench", "Chest", "")).await.unwrap();
    let mut high = NewLoggedSet::on(id, "60", "8", june(4));
    high.quality = 9;
    let mut low = NewLoggedSet::on(id, "60", "8", june(5));
    low.quality = 0;
    storage.log_set(&high).await.unwrap();
    storage.log_set(&low).await.unwrap();

    let sets = storage.sets_for_exercise(id).await.unwrap();
    let qualities: Vec<i64> = sets.iter().map(|s| s.quality).collect();
    assert_eq!(qualities, vec![5, 1]);

    teardown_test_db(storage).await;
  }

  #[tokio::test]
  async fn test_start_cycle_leaves_exactly_one_active() {
    let storage = setup_test_db().await;
    assert_eq!(storage.active_cycle().await.unwrap(), None);

    let first = storage.start_cycle(&new_cycle("Base", "01/05")).await.unwrap();
    let second = storage.start_cycle(&new_cycle("Peak", "01/06")).await.unwrap();

    let cycles = storage.list_cycles().await.unwrap();
    assert_eq!(cycles.len(), 2);
    assert_eq!(cycles.iter().filter(|c| c.is_active).count(), 1);

    let closed = cycles.iter().find(|c| c.id == first).unwrap();
    assert!(!closed.is_active);
    assert_eq!(closed.end_date.as_deref(), Some("01/06"));

    let active = storage.active_cycle().await.unwrap().unwrap();
    assert_eq!(active.id, second);
    assert_eq!(active.end_date, None);

    teardown_test_db(storage).await;
  }

  #[tokio::test]
  async fn test_new_records_join_the_active_cycle() {
    let storage = setup_test_db().await;
    let cycle = storage.start_cycle(&new_cycle("Hypertrophy", "01/06")).await.unwrap();

    let id = storage.add_exercise(&new_exercise("Press", "Shoulders", "")).await.unwrap();
    storage.log_set(&NewLoggedSet::on(id, "40", "10", june(5))).await.unwrap();

    let mut pinned = NewLoggedSet::on(id, "40", "10", june(6));
    pinned.cycle_id = Some(77);
    storage.log_set(&pinned).await.unwrap();

    assert_eq!(storage.get_exercise(id).await.unwrap().cycle_id, cycle);
    let sets = storage.sets_for_exercise(id).await.unwrap();
    assert_eq!(sets[0].cycle_id, cycle);
    assert_eq!(sets[1].cycle_id, 77);

    teardown_test_db(storage).await;
  }

  #[tokio::test]
  async fn test_import_default_exercises() {
    let storage = setup_test_db().await;

    let ids = storage.import_default_exercises().await.unwrap();
    assert_eq!(ids.len(), 5);

    let exercises = storage.list_exercises().await.unwrap();
    assert_eq!(exercises[0].name, "Bench Press");
    assert_eq!(exercises[0].day_of_week, "Monday");
    assert_eq!(exercises[2].scheme, "3x5");

    teardown_test_db(storage).await;
  }

  #[tokio::test]
  async fn test_load_snapshot() {
    let storage = setup_test_db().await;
    storage.start_cycle(&new_cycle("Base", "01/06")).await.unwrap();
    let bench = storage.add_exercise(&new_exercise("Bench", "Chest", "")).await.unwrap();
    let row = storage.add_exercise(&new_exercise("Row", "Back", "")).await.unwrap();
    seed_test_sets(&storage, bench, &[("60", "10"), ("60", "9")], june(3)).await;
    seed_test_sets(&storage, row, &[("50", "12")], june(4)).await;

    let snapshot = storage.load_snapshot().await.unwrap();
    assert_eq!(snapshot.exercises.len(), 2);
    assert_eq!(snapshot.sets.len(), 3);
    assert_eq!(snapshot.cycles.len(), 1);
    assert_eq!(snapshot.sets_for(bench).len(), 2);
    assert_eq!(snapshot.sets_for(row)[0].reps, "12");

    teardown_test_db(storage).await;
  }

  #[tokio::test]
  async fn test_open_creates_database_file() {
    let dir = std::env::temp_dir().join(format!("lift-log-test-{}", std::process::id()));
    let path = dir.join("nested").join("gym.db");

    let storage = Storage::open(&path).await.unwrap();
    storage.add_exercise(&new_exercise("Squat", "Legs", "")).await.unwrap();
    storage.close().await;

    let reopened = Storage::open(&path).await.unwrap();
    assert_eq!(reopened.list_exercises().await.unwrap().len(), 1);
    reopened.close().await;

    std::fs::remove_dir_all(&dir).unwrap();
  }

  #[test]
  fn test_storage_error_serializes_as_message() {
    let err = StorageError::NotFound("set 3".to_string());
    assert_eq!(serde_json::to_string(&err).unwrap(), "\"Not found: set 3\"");
  }
}
