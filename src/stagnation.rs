//! Plateau and form-deviation detection
//!
//! Per-day summaries are ranked by top weight, heaviest first, and the
//! comparisons below run over that ranking. "Current" therefore means
//! "heaviest day", not "latest day". The two diverge once a lifter deloads.

use serde::{Deserialize, Serialize};

use crate::metrics::{sessions, DayKey};
use crate::models::LoggedSet;

/// Minimum history before any classification is attempted
pub const MIN_SETS: usize = 10;

const RANKED_DAYS: usize = 4;
const QUALITY_FLOOR: f64 = 4.0;
const PLATEAU_WEEKS: u32 = 2;

pub const DELOAD_SUGGESTION: &str =
    "Plateau detected: try a 10% deload or change technique (e.g. rest-pause).";
pub const FORM_WARNING: &str =
    "Warning: load went up while reps and technical control went down.";

// ---------------------------------------------------------------------------
/// Stagnation Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StagnationStatus {
    Progressing,
    Stagnated { weeks: u32, suggestion: String },
    FormDeviated { warning: String },
}

impl std::fmt::Display for StagnationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Progressing => write!(f, "progressing"),
            Self::Stagnated { weeks, .. } => write!(f, "stagnated ({} weeks)", weeks),
            Self::FormDeviated { .. } => write!(f, "form_deviated"),
        }
    }
}

/// One day of an exercise, reduced to what the detector compares
#[derive(Debug, Clone, PartialEq)]
struct DaySummary {
    key: DayKey,
    max_weight: f64,
    mean_quality: f64,
    total_reps: i64,
}

// ---------------------------------------------------------------------------
/// Detection
// ---------------------------------------------------------------------------

/// Classify one exercise's history
pub fn detect_stagnation(sets: &[LoggedSet]) -> StagnationStatus {
    if sets.len() < MIN_SETS {
        return StagnationStatus::Progressing;
    }

    let mut days: Vec<DaySummary> = sessions(sets)
        .iter()
        .map(|session| DaySummary {
            key: DayKey::new(&session.date),
            max_weight: session.max_weight(),
            mean_quality: session.mean_quality(),
            total_reps: session.total_reps(),
        })
        .collect();

    // Heaviest first; equal weights put the later day first
    days.sort_by(|a, b| {
        b.max_weight
            .total_cmp(&a.max_weight)
            .then_with(|| b.key.cmp(&a.key))
    });
    days.truncate(RANKED_DAYS);

    if days.len() < 3 {
        return StagnationStatus::Progressing;
    }

    let current = &days[0];
    let previous = &days[1];

    if current.max_weight > previous.max_weight
        && current.total_reps < previous.total_reps
        && current.mean_quality < QUALITY_FLOOR
    {
        return StagnationStatus::FormDeviated {
            warning: FORM_WARNING.to_string(),
        };
    }

    let flat = days[0].max_weight <= days[1].max_weight && days[1].max_weight <= days[2].max_weight;
    if flat {
        StagnationStatus::Stagnated {
            weeks: PLATEAU_WEEKS,
            suggestion: DELOAD_SUGGESTION.to_string(),
        }
    } else {
        StagnationStatus::Progressing
    }
}
