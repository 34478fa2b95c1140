//! Time-to-milestone forecast from the per-day top weight trend
//!
//! Straight-line extrapolation: total gain spread evenly across the workouts
//! logged, projected forward to the next multiple of ten. Two sessions a week.

use serde::{Deserialize, Serialize};

use crate::metrics::sessions;
use crate::models::LoggedSet;

const MIN_SETS: usize = 10;
const MIN_WORKOUTS: usize = 5;
const MILESTONE_STEP: f64 = 10.0;
const SESSIONS_PER_WEEK: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrengthPrediction {
    pub exercise_name: String,
    pub current_weight: f64,
    pub target_weight: f64,
    pub average_gain_per_workout: f64,
    pub workouts_to_reach: u32,
    pub weeks_to_reach: u32,
    /// current / target, 0.0 to 1.0
    pub sync_percentage: f64,
}

/// Next multiple of ten strictly above `weight`
pub fn next_milestone(weight: f64) -> f64 {
    ((weight / MILESTONE_STEP).floor() + 1.0) * MILESTONE_STEP
}

/// Forecast for one exercise. `None` means not enough history or no upward trend.
pub fn predict_strength(exercise_name: &str, sets: &[LoggedSet]) -> Option<StrengthPrediction> {
    if sets.len() < MIN_SETS {
        return None;
    }

    let top_weights: Vec<f64> = sessions(sets).iter().map(|s| s.max_weight()).collect();
    if top_weights.len() < MIN_WORKOUTS {
        return None;
    }

    let initial = *top_weights.first()?;
    let current = *top_weights.last()?;
    let total_gain = current - initial;
    if total_gain <= 0.0 {
        return None;
    }

    let average_gain = total_gain / top_weights.len() as f64;
    let target = next_milestone(current);
    let remaining = target - current;

    let workouts_to_reach = ((remaining / average_gain).ceil() as u32).max(1);
    let weeks_to_reach = (workouts_to_reach / SESSIONS_PER_WEEK).max(1);

    Some(StrengthPrediction {
        exercise_name: exercise_name.to_string(),
        current_weight: current,
        target_weight: target,
        average_gain_per_workout: average_gain,
        workouts_to_reach,
        weeks_to_reach,
        sync_percentage: (current / target).clamp(0.0, 1.0),
    })
}
