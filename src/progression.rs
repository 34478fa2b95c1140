//! Load Progression Gate
//!
//! Decides whether a lifter may add load to an exercise. Two criteria,
//! both against the most recent workout:
//! - volume completion: at least the prescribed number of sets was done
//! - ceiling mastery: every one of those sets reached the top of the rep range
//!
//! One good set is not enough. Form first, load second.

use serde::{Deserialize, Serialize};

use crate::metrics::{parse_reps, parse_weight, sessions, target_rep_ceiling, target_set_count};
use crate::models::LoggedSet;

// ---------------------------------------------------------------------------
/// Progression Result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProgressionResult {
    /// No history, or the scheme has no rep ceiling to aim for
    None,
    /// Keep working at the current load
    Consolidating,
    /// Ready to add load; carries the weight used on the last set
    Apt { last_weight: f64 },
}

impl ProgressionResult {
    pub fn is_apt(&self) -> bool {
        matches!(self, Self::Apt { .. })
    }
}

impl std::fmt::Display for ProgressionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Consolidating => write!(f, "consolidating"),
            Self::Apt { last_weight } => write!(f, "apt ({} last)", last_weight),
        }
    }
}

// ---------------------------------------------------------------------------
/// Progression Check
// ---------------------------------------------------------------------------

/// Evaluate an exercise's sets against its scheme ("3x8-10").
///
/// `sets` should belong to a single exercise; any order is fine.
pub fn progression_status(scheme: &str, sets: &[LoggedSet]) -> ProgressionResult {
    let grouped = sessions(sets);
    let last_workout = match grouped.last() {
        Some(session) => session,
        None => return ProgressionResult::None,
    };

    let ceiling = target_rep_ceiling(scheme);
    if ceiling == 0 {
        return ProgressionResult::None;
    }

    let target_sets = target_set_count(scheme) as usize;
    if last_workout.sets.len() < target_sets {
        return ProgressionResult::Consolidating;
    }

    let all_hit_ceiling = last_workout
        .sets
        .iter()
        .all(|s| parse_reps(&s.reps) >= ceiling as i64);

    if !all_hit_ceiling {
        return ProgressionResult::Consolidating;
    }

    // Sessions keep their sets in id order, so the last one is the last logged
    let last_weight = last_workout
        .sets
        .last()
        .map(|s| parse_weight(&s.weight))
        .unwrap_or(0.0);

    ProgressionResult::Apt { last_weight }
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
