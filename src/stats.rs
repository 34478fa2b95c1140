//! Lifetime training stats and the XP leveling curve

use serde::{Deserialize, Serialize};

use crate::metrics::{by_id, distinct_days, max_weight, one_rep_max, parse_reps, total_volume};
use crate::models::{Exercise, LoggedSet, TrainingCycle};

const XP_PER_SET: i64 = 5;
/// One XP per this much volume
const VOLUME_PER_XP: f64 = 20.0;
const XP_PER_WORKOUT: i64 = 50;

const FIRST_LEVEL_THRESHOLD: i64 = 2000;
const THRESHOLD_STEP: i64 = 1000;

/// ---------------------------------------------------------------------------
/// Leveling
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
  pub level: u32,
  /// XP earned inside the current level
  pub current_xp: i64,
  /// XP the current level costs in total
  pub next_level_xp: i64,
}

/// Walk the curve: 2000 for level 2, then 3000, 4000, ...
pub fn level_for_xp(xp: i64) -> LevelProgress {
  let mut remaining = xp.max(0);
  let mut level = 1;
  let mut threshold = FIRST_LEVEL_THRESHOLD;

  while remaining >= threshold {
    remaining -= threshold;
    level += 1;
    threshold += THRESHOLD_STEP;
  }

  LevelProgress {
    level,
    current_xp: remaining,
    next_level_xp: threshold,
  }
}

pub fn experience_points(total_sets: usize, total_volume: f64, workouts: usize) -> i64 {
  XP_PER_SET * total_sets as i64
    + (total_volume / VOLUME_PER_XP).floor() as i64
    + XP_PER_WORKOUT * workouts as i64
}

/// ---------------------------------------------------------------------------
/// User Stats
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
  pub level: u32,
  pub current_xp: i64,
  pub next_level_xp: i64,
  pub total_xp: i64,
  /// Count of distinct training days. Not a consecutive-day streak.
  pub streak: usize,
  pub total_volume: f64,
  pub total_workouts: usize,
  pub total_reps: i64,
  pub total_sets: usize,
  pub max_weight: f64,
  pub max_one_rep_max: f64,
  pub exercise_count: usize,
  pub cycle_count: usize,
}

pub fn calculate_user_stats(
  exercises: &[Exercise],
  sets: &[LoggedSet],
  cycles: &[TrainingCycle],
) -> UserStats {
  let total_volume = total_volume(sets);
  let total_reps: i64 = by_id(sets).iter().map(|s| parse_reps(&s.reps)).sum();
  let total_sets = sets.len();
  let workouts = distinct_days(sets);
  let max_one_rep_max = sets
    .iter()
    .map(|s| one_rep_max(&s.weight, &s.reps))
    .fold(0.0, f64::max);

  let total_xp = experience_points(total_sets, total_volume, workouts);
  let progress = level_for_xp(total_xp);

  tracing::debug!(total_xp, level = progress.level, "Computed user stats");

  UserStats {
    level: progress.level,
    current_xp: progress.current_xp,
    next_level_xp: progress.next_level_xp,
    total_xp,
    streak: workouts,
    total_volume,
    total_workouts: workouts,
    total_reps,
    total_sets,
    max_weight: max_weight(sets),
    max_one_rep_max,
    exercise_count: exercises.len(),
    cycle_count: cycles.len(),
  }
}
