//! Rule-based training coach
//!
//! Scans the whole history and emits advisory insights. Every rule is
//! evaluated independently and all that fire are returned, in rule order.
//! Nothing here is stateful: callers re-derive the list from current data.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::metrics::{sessions, Session};
use crate::models::{Exercise, LoggedSet};
use crate::stagnation::{detect_stagnation, StagnationStatus};

const SPIKE_MIN_DAYS: usize = 7;
const SPIKE_BASELINE_DAYS: usize = 5;
const SPIKE_FACTOR: f64 = 1.5;

const HISTORY_MIN_DAYS: usize = 14;
const WEAK_STIMULUS_FACTOR: f64 = 0.4;

const OVERUSE_WINDOW_DAYS: usize = 3;
const OVERUSE_MAX_SETS: usize = 25;

/// ---------------------------------------------------------------------------
/// Insight Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
  Low,
  Medium,
  High,
  /// Informational, no risk attached
  Insight,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
  pub title: String,
  pub description: String,
  pub risk_level: RiskLevel,
  pub suggestion: String,
  /// Compares the lifter against their own past
  pub is_comparison: bool,
}

impl Insight {
  fn new(title: String, description: String, risk_level: RiskLevel, suggestion: &str) -> Self {
    Self {
      title,
      description,
      risk_level,
      suggestion: suggestion.to_string(),
      is_comparison: false,
    }
  }

  fn comparison(mut self) -> Self {
    self.is_comparison = true;
    self
  }
}

/// ---------------------------------------------------------------------------
/// Analysis
/// ---------------------------------------------------------------------------

pub fn analyze_training_patterns(exercises: &[Exercise], sets: &[LoggedSet]) -> Vec<Insight> {
  let mut insights = Vec::new();
  if sets.is_empty() {
    return insights;
  }

  // Oldest day first
  let days = sessions(sets);

  insights.extend(volume_spike(&days));
  insights.extend(historical_comparison(&days));
  insights.extend(regional_overuse(exercises, &days));
  insights.extend(plateau_forecast(exercises, sets));

  tracing::debug!(
    days = days.len(),
    insights = insights.len(),
    "Analyzed training patterns"
  );

  insights
}

fn mean(values: &[f64]) -> f64 {
  if values.is_empty() {
    0.0
  } else {
    values.iter().sum::<f64>() / values.len() as f64
  }
}

/// Index of the first maximum (or minimum with `lowest`)
fn first_extreme(values: &[f64], lowest: bool) -> Option<usize> {
  let mut best: Option<usize> = None;
  for (i, v) in values.iter().enumerate() {
    let better = match best {
      None => true,
      Some(b) if lowest => *v < values[b],
      Some(b) => *v > values[b],
    };
    if better {
      best = Some(i);
    }
  }
  best
}

/// Latest day against the mean of the five days before it
fn volume_spike(days: &[Session<'_>]) -> Option<Insight> {
  if days.len() < SPIKE_MIN_DAYS {
    return None;
  }

  let latest = days.last()?.volume();
  let baseline: Vec<f64> = days
    .iter()
    .rev()
    .skip(1)
    .take(SPIKE_BASELINE_DAYS)
    .map(|d| d.volume())
    .collect();

  if latest > mean(&baseline) * SPIKE_FACTOR {
    Some(Insight::new(
      "Volume Spike Detected".to_string(),
      "Today's volume was more than 50% above your recent average.".to_string(),
      RiskLevel::Medium,
      "Drop one set from each exercise next session to avoid central fatigue.",
    ))
  } else {
    None
  }
}

/// Best, most efficient and weakest days over a long history
fn historical_comparison(days: &[Session<'_>]) -> Vec<Insight> {
  let mut insights = Vec::new();
  if days.len() < HISTORY_MIN_DAYS {
    return insights;
  }

  let volumes: Vec<f64> = days.iter().map(|d| d.volume()).collect();
  let qualities: Vec<f64> = days.iter().map(|d| d.mean_quality()).collect();

  if let Some(peak) = first_extreme(&volumes, false) {
    insights.push(
      Insight::new(
        "Best Historical Phase".to_string(),
        format!(
          "Your peak was on {} with {:.0} kg of total volume.",
          days[peak].date, volumes[peak]
        ),
        RiskLevel::Insight,
        "Look back at how you were eating and sleeping around then.",
      )
      .comparison(),
    );
  }

  if let Some(cleanest) = first_extreme(&qualities, false) {
    insights.push(
      Insight::new(
        "Most Efficient Phase".to_string(),
        format!(
          "On {} you had your best average technical quality.",
          days[cleanest].date
        ),
        RiskLevel::Insight,
        "Remember: quality beats load for long-term hypertrophy.",
      )
      .comparison(),
    );
  }

  let average = mean(&volumes);
  if let Some(weakest) = first_extreme(&volumes, true) {
    if volumes[weakest] < average * WEAK_STIMULUS_FACTOR {
      insights.push(
        Insight::new(
          "Weakest Stimulus Point".to_string(),
          format!("On {} your volume dropped sharply.", days[weakest].date),
          RiskLevel::Low,
          "Work out what drained your motivation so the pattern doesn't repeat.",
        )
        .comparison(),
      );
    }
  }

  insights
}

/// Sets per category across the last three training days
fn regional_overuse(exercises: &[Exercise], days: &[Session<'_>]) -> Vec<Insight> {
  let by_id: HashMap<i64, &Exercise> = exercises.iter().map(|e| (e.id, e)).collect();
  let window_start = days.len().saturating_sub(OVERUSE_WINDOW_DAYS);

  let mut tally: BTreeMap<&str, usize> = BTreeMap::new();
  for day in &days[window_start..] {
    for set in &day.sets {
      if let Some(exercise) = by_id.get(&set.exercise_id) {
        *tally.entry(exercise.category.trim()).or_default() += 1;
      }
    }
  }

  tally
    .into_iter()
    .filter(|(_, count)| *count > OVERUSE_MAX_SETS)
    .map(|(muscle, count)| {
      Insight::new(
        format!("Injury Risk: {}", muscle),
        format!(
          "{} sets of {} accumulated over the last 72h.",
          count, muscle
        ),
        RiskLevel::High,
        "Give this muscle group 48h of complete rest.",
      )
    })
    .collect()
}

/// Run the plateau detector over every exercise
fn plateau_forecast(exercises: &[Exercise], sets: &[LoggedSet]) -> Vec<Insight> {
  let mut ordered: Vec<&Exercise> = exercises.iter().collect();
  ordered.sort_by_key(|e| e.id);

  ordered
    .into_iter()
    .filter_map(|exercise| {
      let exercise_sets: Vec<LoggedSet> = sets
        .iter()
        .filter(|s| s.exercise_id == exercise.id)
        .cloned()
        .collect();

      match detect_stagnation(&exercise_sets) {
        StagnationStatus::Stagnated { suggestion, .. } => Some(Insight::new(
          format!("Imminent Plateau: {}", exercise.name),
          "Progress has stalled. This stimulus has stopped driving adaptation.".to_string(),
          RiskLevel::Medium,
          &suggestion,
        )),
        StagnationStatus::Progressing | StagnationStatus::FormDeviated { .. } => None,
      }
    })
    .collect()
}
