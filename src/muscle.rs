//! Per-muscle-group stimulus, fatigue and heat
//!
//! Sets are attributed to a muscle group through their exercise: either the
//! exercise's category is the group, or its free-text target mentions it.
//! One exercise can feed more than one group ("Chest / Shoulders").

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::metrics::{by_id, parse_reps, parse_weight, resolve_date, set_volume, total_volume, DayKey};
use crate::models::{Exercise, LoggedSet};

/// Volume at which a group's heat saturates
const HEAT_SATURATION_VOLUME: f64 = 5000.0;
/// Days until a group counts as fully recovered
const RECOVERY_DAYS: f64 = 3.0;
const GROWTH_VOLUME: f64 = 1000.0;
/// Total volume is spread over a nominal four-week month
const WEEKS_PER_BLOCK: f64 = 4.0;

/// ---------------------------------------------------------------------------
/// Category Vocabulary
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
  Chest,
  Back,
  Legs,
  Shoulders,
  Arms,
  Core,
  General,
}

/// Groups that get their own stimulus row
pub const TRACKED_GROUPS: [Category; 5] = [
  Category::Chest,
  Category::Back,
  Category::Legs,
  Category::Shoulders,
  Category::Arms,
];

impl Category {
  pub fn as_str(&self) -> &'static str {
    match self {
      Category::Chest => "Chest",
      Category::Back => "Back",
      Category::Legs => "Legs",
      Category::Shoulders => "Shoulders",
      Category::Arms => "Arms",
      Category::Core => "Core",
      Category::General => "General",
    }
  }

  /// Does this exercise work the group?
  pub fn matches(&self, exercise: &Exercise) -> bool {
    let label = self.as_str();
    exercise.category.trim().eq_ignore_ascii_case(label)
      || exercise
        .target
        .to_lowercase()
        .contains(&label.to_lowercase())
  }
}

impl std::fmt::Display for Category {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for Category {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    [
      Category::Chest,
      Category::Back,
      Category::Legs,
      Category::Shoulders,
      Category::Arms,
      Category::Core,
      Category::General,
    ]
    .into_iter()
    .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
    .ok_or_else(|| format!("Unknown category: {}", s))
  }
}

/// Best-effort category from a free-text target ("Upper chest", "Rear delts")
pub fn guess_category(target: &str) -> Category {
  let t = target.to_lowercase();
  let has = |words: &[&str]| words.iter().any(|w| t.contains(*w));

  if has(&["chest", "pec"]) {
    Category::Chest
  } else if has(&["back", "lats", "latissimus", "dorsal", "rhomboid"]) {
    Category::Back
  } else if has(&["leg", "quad", "glute", "hamstring", "calf", "calves", "thigh", "adductor", "abductor"]) {
    Category::Legs
  } else if has(&["shoulder", "delt", "trap"]) {
    Category::Shoulders
  } else if has(&["bicep", "tricep", "arm", "brachi"]) {
    Category::Arms
  } else if has(&["abs", "abdominal", "core", "oblique"]) {
    Category::Core
  } else {
    Category::General
  }
}

/// ---------------------------------------------------------------------------
/// Muscle Stimulus
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthPhase {
  Growing,
  Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MuscleStimulus {
  pub muscle: Category,
  pub max_weight: f64,
  pub total_volume: f64,
  pub weekly_volume: f64,
  pub total_sets: usize,
  pub total_reps: i64,
  pub growth_phase: GrowthPhase,
  /// 0.0 (cold) to 1.0 (saturated)
  pub heat_intensity: f64,
  /// 0.0 (fresh) to 1.0 (just trained)
  pub fatigue_level: f64,
}

pub fn heat_intensity(volume: f64) -> f64 {
  (volume / HEAT_SATURATION_VOLUME).clamp(0.0, 1.0)
}

/// Linear recovery from 1.0 on the training day to 0.0 three days later.
/// A token that cannot be placed on the calendar reads as fully recovered.
pub fn fatigue_level(last_token: &str, as_of: NaiveDate) -> f64 {
  match resolve_date(last_token, as_of) {
    Some(day) => {
      let days_passed = (as_of - day).num_days().abs() as f64;
      (1.0 - days_passed / RECOVERY_DAYS).clamp(0.0, 1.0)
    }
    None => 0.0,
  }
}

/// Stimulus rows for the five tracked groups, in fixed order
pub fn muscle_analytics(
  exercises: &[Exercise],
  sets: &[LoggedSet],
  as_of: NaiveDate,
) -> Vec<MuscleStimulus> {
  let ordered = by_id(sets);

  TRACKED_GROUPS
    .iter()
    .map(|group| {
      let exercise_ids: HashSet<i64> = exercises
        .iter()
        .filter(|e| group.matches(e))
        .map(|e| e.id)
        .collect();

      let relevant: Vec<&LoggedSet> = ordered
        .iter()
        .copied()
        .filter(|s| exercise_ids.contains(&s.exercise_id))
        .collect();

      let max_weight = relevant
        .iter()
        .map(|s| parse_weight(&s.weight))
        .fold(0.0, f64::max);
      let volume: f64 = relevant.iter().map(|s| set_volume(s)).sum();
      let total_reps: i64 = relevant.iter().map(|s| parse_reps(&s.reps)).sum();

      let fatigue = relevant
        .iter()
        .max_by_key(|s| (DayKey::new(&s.date), s.id))
        .map(|s| fatigue_level(&s.date, as_of))
        .unwrap_or(0.0);

      MuscleStimulus {
        muscle: *group,
        max_weight,
        total_volume: volume,
        weekly_volume: volume / WEEKS_PER_BLOCK,
        total_sets: relevant.len(),
        total_reps,
        growth_phase: if volume > GROWTH_VOLUME {
          GrowthPhase::Growing
        } else {
          GrowthPhase::Stable
        },
        heat_intensity: heat_intensity(volume),
        fatigue_level: fatigue,
      }
    })
    .collect()
}

/// ---------------------------------------------------------------------------
/// Transformation Tier
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformationTier {
  Dormant,
  Awakening,
  Hardened,
  Apex,
}

impl TransformationTier {
  pub fn label(&self) -> &'static str {
    match self {
      Self::Dormant => "DORMANT",
      Self::Awakening => "AWAKENING",
      Self::Hardened => "HARDENED",
      Self::Apex => "APEX",
    }
  }

  pub fn description(&self) -> &'static str {
    match self {
      Self::Dormant => "The barbell has heard rumours about you. Nothing confirmed.",
      Self::Awakening => "You showed up. A strong breeze still wins most arguments.",
      Self::Hardened => "Real strength now. Doorframes have started to worry.",
      Self::Apex => "You don't train with the iron anymore. You discipline it.",
    }
  }
}

/// Tier from lifetime volume and the heaviest single weight
pub fn transformation_tier(sets: &[LoggedSet]) -> TransformationTier {
  let volume = total_volume(sets);
  let heaviest = crate::metrics::max_weight(sets);

  if volume > 20000.0 || heaviest > 180.0 {
    TransformationTier::Apex
  } else if volume > 10000.0 {
    TransformationTier::Hardened
  } else if volume > 5000.0 {
    TransformationTier::Awakening
  } else {
    TransformationTier::Dormant
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::assert_approx_eq;
  use crate::test_utils::{mock_exercise, mock_set};

  fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn test_heat_saturates() {
    assert_eq!(heat_intensity(5000.0), 1.0);
    assert_eq!(heat_intensity(10000.0), 1.0);
    assert_eq!(heat_intensity(2500.0), 0.5);
    assert_eq!(heat_intensity(0.0), 0.0);
  }

  #[test]
  fn test_fatigue_decays_over_three_days() {
    let as_of = day(2024, 3, 10);
    assert_eq!(fatigue_level("10/03", as_of), 1.0);
    assert_approx_eq!(fatigue_level("09/03", as_of), 2.0 / 3.0, 1e-9);
    assert_eq!(fatigue_level("07/03", as_of), 0.0);
    assert_eq!(fatigue_level("01/01", as_of), 0.0);
    assert_eq!(fatigue_level("yesterday", as_of), 0.0);
  }

  #[test]
  fn test_groups_match_category_or_target() {
    let exercises = vec![
      mock_exercise(1, "Bench Press", "Chest", "Chest"),
      mock_exercise(2, "Dips", "Lower chest / triceps", "Arms"),
      mock_exercise(3, "Squat", "Quads", "Legs"),
    ];
    let sets = vec![
      mock_set(1, 1, "100", "5", "10/03"),
      mock_set(2, 2, "20", "10", "09/03"),
      mock_set(3, 3, "140", "5", "01/03"),
    ];

    let rows = muscle_analytics(&exercises, &sets, day(2024, 3, 10));
    assert_eq!(rows.len(), 5);

    let chest = &rows[0];
    assert_eq!(chest.muscle, Category::Chest);
    assert_eq!(chest.total_sets, 2);
    assert_eq!(chest.total_volume, 700.0);
    assert_eq!(chest.weekly_volume, 175.0);
    assert_eq!(chest.max_weight, 100.0);
    assert_eq!(chest.total_reps, 15);
    assert_eq!(chest.growth_phase, GrowthPhase::Stable);
    assert_eq!(chest.fatigue_level, 1.0);

    let arms = rows.iter().find(|r| r.muscle == Category::Arms).unwrap();
    assert_eq!(arms.total_sets, 1);
    assert_approx_eq!(arms.fatigue_level, 2.0 / 3.0, 1e-9);

    let legs = rows.iter().find(|r| r.muscle == Category::Legs).unwrap();
    assert_eq!(legs.total_volume, 700.0);
    assert_eq!(legs.fatigue_level, 0.0);

    let back = rows.iter().find(|r| r.muscle == Category::Back).unwrap();
    assert_eq!(back.total_sets, 0);
    assert_eq!(back.heat_intensity, 0.0);
    assert_eq!(back.fatigue_level, 0.0);
  }

  #[test]
  fn test_analytics_are_order_independent() {
    let mut exercises = vec![
      mock_exercise(1, "Bench Press", "Chest", "Chest"),
      mock_exercise(2, "Curl", "Biceps", "Arms"),
      mock_exercise(3, "Row", "Back", "Back"),
    ];
    let mut sets = vec![
      mock_set(1, 1, "100", "5", "08/03"),
      mock_set(2, 2, "20", "12", "09/03"),
      mock_set(3, 1, "102,5", "5", "10/03"),
      mock_set(4, 3, "80", "10", "02/03"),
      mock_set(5, 2, "22", "10", "10/03"),
      mock_set(6, 3, "85", "8", "bad day"),
    ];
    let as_of = day(2024, 3, 10);
    let expected = muscle_analytics(&exercises, &sets, as_of);

    sets.reverse();
    exercises.reverse();
    assert_eq!(muscle_analytics(&exercises, &sets, as_of), expected);

    sets.rotate_left(2);
    exercises.rotate_left(1);
    assert_eq!(muscle_analytics(&exercises, &sets, as_of), expected);
  }

  #[test]
  fn test_growth_phase_threshold() {
    let exercises = vec![mock_exercise(1, "Row", "Back", "Back")];
    let sets = vec![
      mock_set(1, 1, "100", "10", "01/03"),
      mock_set(2, 1, "10", "1", "01/03"),
    ];
    let rows = muscle_analytics(&exercises, &sets, day(2024, 3, 1));
    assert_eq!(rows[1].growth_phase, GrowthPhase::Growing);
    assert_approx_eq!(rows[1].heat_intensity, 1010.0 / 5000.0, 1e-9);
  }

  #[test]
  fn test_transformation_tiers() {
    assert_eq!(transformation_tier(&[]), TransformationTier::Dormant);

    let single = |w: &str, r: &str| vec![mock_set(1, 1, w, r, "01/01")];
    assert_eq!(transformation_tier(&single("100", "50")), TransformationTier::Dormant);
    assert_eq!(transformation_tier(&single("100", "51")), TransformationTier::Awakening);
    assert_eq!(transformation_tier(&single("100", "101")), TransformationTier::Hardened);
    assert_eq!(transformation_tier(&single("100", "201")), TransformationTier::Apex);
    assert_eq!(transformation_tier(&single("181", "1")), TransformationTier::Apex);
    assert!(TransformationTier::Apex > TransformationTier::Hardened);
    assert_eq!(TransformationTier::Apex.label(), "APEX");
  }

  #[test]
  fn test_guess_category() {
    assert_eq!(guess_category("Upper chest"), Category::Chest);
    assert_eq!(guess_category("Latissimus dorsi"), Category::Back);
    assert_eq!(guess_category("Lateral delts"), Category::Shoulders);
    assert_eq!(guess_category("Hamstrings / glutes"), Category::Legs);
    assert_eq!(guess_category("Biceps"), Category::Arms);
    assert_eq!(guess_category("Obliques"), Category::Core);
    assert_eq!(guess_category("Grip"), Category::General);
  }

  #[test]
  fn test_category_round_trips_through_text() {
    assert_eq!("shoulders".parse::<Category>(), Ok(Category::Shoulders));
    assert!("Neck".parse::<Category>().is_err());
    assert_eq!(Category::General.to_string(), "General");
  }
}
