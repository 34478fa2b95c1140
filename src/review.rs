//! Review-hub analytics: radar attributes, month over month, ghost session

use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::metrics::{
  by_id, max_weight, one_rep_max, parse_reps, parse_weight, resolve_date, sessions, set_volume,
  target_set_count,
};
use crate::models::{Exercise, LoggedSet};

/// ---------------------------------------------------------------------------
/// Power Radar
/// ---------------------------------------------------------------------------

/// Five attributes, each normalised to 0.1..=1.0 for a radar chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerRadar {
  pub strength: f64,
  pub endurance: f64,
  pub consistency: f64,
  pub explosiveness: f64,
  pub recovery: f64,
}

const RADAR_FLOOR: f64 = 0.1;

fn radar_scale(value: f64, full_at: f64) -> f64 {
  (value / full_at).clamp(RADAR_FLOOR, 1.0)
}

pub fn power_radar(sets: &[LoggedSet]) -> PowerRadar {
  let strength = if sets.is_empty() {
    0.2
  } else {
    let best = sets
      .iter()
      .map(|s| one_rep_max(&s.weight, &s.reps))
      .fold(0.0, f64::max);
    radar_scale(best, 200.0)
  };

  let total_reps: i64 = sets.iter().map(|s| parse_reps(&s.reps)).sum();
  let endurance = radar_scale(total_reps as f64, 5000.0);

  let days = sessions(sets);
  let consistency = radar_scale(days.len() as f64, 30.0);

  let explosiveness = if sets.len() < 10 || days.len() < 2 {
    0.3
  } else {
    let first = days.first().map(|d| d.max_weight()).unwrap_or(0.0);
    let last = days.last().map(|d| d.max_weight()).unwrap_or(0.0);
    radar_scale(last - first, 50.0)
  };

  let recovery = if sets.is_empty() {
    0.5
  } else {
    let quality: f64 = by_id(sets).iter().map(|s| s.quality as f64).sum();
    (quality / sets.len() as f64 / 5.0).clamp(RADAR_FLOOR, 1.0)
  };

  PowerRadar {
    strength,
    endurance,
    consistency,
    explosiveness,
    recovery,
  }
}

/// ---------------------------------------------------------------------------
/// Month over Month
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyComparison {
  pub this_month_volume: f64,
  pub last_month_volume: f64,
  /// Percentage change; 0 when there is no previous month to compare against
  pub change_pct: f64,
}

/// Volume this calendar month against the previous one.
///
/// Tokens take the year of `as_of`, so in January last December's sets land
/// in the future and are not counted as "last month".
pub fn monthly_comparison(sets: &[LoggedSet], as_of: NaiveDate) -> MonthlyComparison {
  let previous = as_of.checked_sub_months(Months::new(1)).unwrap_or(as_of);
  let same_month = |d: NaiveDate, m: NaiveDate| d.year() == m.year() && d.month() == m.month();

  let mut this_month_volume = 0.0;
  let mut last_month_volume = 0.0;
  for set in by_id(sets) {
    let Some(day) = resolve_date(&set.date, as_of) else {
      continue;
    };
    if same_month(day, as_of) {
      this_month_volume += set_volume(set);
    } else if same_month(day, previous) {
      last_month_volume += set_volume(set);
    }
  }

  let change_pct = if last_month_volume > 0.0 {
    (this_month_volume - last_month_volume) / last_month_volume * 100.0
  } else {
    0.0
  };

  MonthlyComparison {
    this_month_volume,
    last_month_volume,
    change_pct,
  }
}

/// ---------------------------------------------------------------------------
/// Ghost Session
/// ---------------------------------------------------------------------------

/// Today's sets raced against the previous session of the same exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GhostSession {
  pub ghost_date: String,
  pub ghost_sets: Vec<LoggedSet>,
  pub ghost_top_weight: f64,
  pub completed_today: usize,
  /// Sets the scheme asks for; 0 when the scheme has no count
  pub target_sets: u32,
}

impl GhostSession {
  pub fn ghost_set_count(&self) -> usize {
    self.ghost_sets.len()
  }

  pub fn caught_up(&self) -> bool {
    self.completed_today >= self.ghost_sets.len()
  }
}

/// `None` until the exercise has a session before today
pub fn ghost_session(scheme: &str, sets: &[LoggedSet], as_of: NaiveDate) -> Option<GhostSession> {
  let is_today = |token: &str| resolve_date(token, as_of) == Some(as_of);
  let days = sessions(sets);

  let completed_today = days
    .iter()
    .find(|d| is_today(&d.date))
    .map(|d| d.sets.len())
    .unwrap_or(0);

  let ghost = days.iter().rev().find(|d| !is_today(&d.date))?;

  Some(GhostSession {
    ghost_date: ghost.date.clone(),
    ghost_sets: ghost.sets.iter().map(|s| (*s).clone()).collect(),
    ghost_top_weight: ghost.max_weight(),
    completed_today,
    target_sets: target_set_count(scheme),
  })
}

/// ---------------------------------------------------------------------------
/// Consistency Log
/// ---------------------------------------------------------------------------

/// Every day trained, most recent first
pub fn consistency_log(sets: &[LoggedSet]) -> Vec<String> {
  sessions(sets).into_iter().rev().map(|d| d.date).collect()
}

/// Lifetime best for a set list
pub fn personal_record(sets: &[LoggedSet]) -> f64 {
  max_weight(sets)
}

/// ---------------------------------------------------------------------------
/// Volume Ranking
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseVolume {
  pub exercise_id: i64,
  pub name: String,
  pub total_volume: f64,
}

/// Accumulated volume per exercise, largest first. Untrained exercises are left out.
pub fn exercise_volumes(exercises: &[Exercise], sets: &[LoggedSet]) -> Vec<ExerciseVolume> {
  let ordered = by_id(sets);

  let mut ranking: Vec<ExerciseVolume> = exercises
    .iter()
    .map(|e| ExerciseVolume {
      exercise_id: e.id,
      name: e.name.clone(),
      total_volume: ordered
        .iter()
        .filter(|s| s.exercise_id == e.id)
        .map(|s| set_volume(s))
        .sum(),
    })
    .filter(|v| v.total_volume > 0.0)
    .collect();

  ranking.sort_by(|a, b| {
    b.total_volume
      .total_cmp(&a.total_volume)
      .then(a.exercise_id.cmp(&b.exercise_id))
  });
  ranking
}

/// ---------------------------------------------------------------------------
/// Evolution
/// ---------------------------------------------------------------------------

/// One point on the load, reps and estimated 1RM charts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionPoint {
  pub set_id: i64,
  pub date: String,
  pub weight: f64,
  pub reps: i64,
  pub one_rep_max: f64,
}

/// Every set as a chart point, oldest first. The last point is the headline value.
pub fn evolution_series(sets: &[LoggedSet]) -> Vec<EvolutionPoint> {
  sessions(sets)
    .iter()
    .flat_map(|day| day.sets.iter())
    .map(|s| EvolutionPoint {
      set_id: s.id,
      date: s.date.clone(),
      weight: parse_weight(&s.weight),
      reps: parse_reps(&s.reps),
      one_rep_max: one_rep_max(&s.weight, &s.reps),
    })
    .collect()
}

/// ---------------------------------------------------------------------------
/// Weekly Grouping
/// ---------------------------------------------------------------------------

/// ISO week a set falls in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrainingWeek {
  pub year: i32,
  pub week: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekGroup {
  /// `None` holds sets whose date cannot be read
  pub week: Option<TrainingWeek>,
  pub sets: Vec<LoggedSet>,
  pub volume: f64,
}

/// Sets bucketed by training week, newest week first and unreadable dates last.
///
/// "DD/MM" tokens take the year of `as_of`. Within a week sets stay chronological.
pub fn weekly_groups(sets: &[LoggedSet], as_of: NaiveDate) -> Vec<WeekGroup> {
  let mut weeks: BTreeMap<Option<TrainingWeek>, Vec<LoggedSet>> = BTreeMap::new();

  for day in sessions(sets) {
    let week = resolve_date(&day.date, as_of).map(|d| {
      let iso = d.iso_week();
      TrainingWeek {
        year: iso.year(),
        week: iso.week(),
      }
    });
    weeks
      .entry(week)
      .or_default()
      .extend(day.sets.iter().map(|s| (*s).clone()));
  }

  // None sorts first, so reversing puts it last
  weeks
    .into_iter()
    .rev()
    .map(|(week, sets)| WeekGroup {
      volume: sets.iter().map(set_volume).sum(),
      week,
      sets,
    })
    .collect()
}
