use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::metrics::format_day_token;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Exercise {
  pub id: i64,
  pub name: String,
  /// Free-text muscle target, e.g. "Upper chest"
  pub target: String,
  pub category: String,
  /// Target prescription such as "4x8-12"
  pub scheme: String,
  pub day_of_week: String,
  pub image_uri: Option<String>,
  pub cycle_id: i64,
}

/// For inserting new exercises (without id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExercise {
  pub name: String,
  pub target: String,
  /// Empty means "guess from target"
  pub category: String,
  pub scheme: String,
  pub day_of_week: String,
  pub image_uri: Option<String>,
  /// None means "attach to the active cycle"
  pub cycle_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LoggedSet {
  pub id: i64,
  pub exercise_id: i64,
  /// Weight exactly as entered; may not parse
  pub weight: String,
  /// Reps exactly as entered; may not parse
  pub reps: String,
  /// Day token "DD/MM"
  pub date: String,
  pub cycle_id: i64,
  pub technique: Option<String>,
  /// Technical control, 1-5
  pub quality: i64,
}

/// For inserting new sets (without id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLoggedSet {
  pub exercise_id: i64,
  pub weight: String,
  pub reps: String,
  pub date: String,
  pub cycle_id: Option<i64>,
  pub technique: Option<String>,
  pub quality: i64,
}

impl NewLoggedSet {
  /// A plain set logged on `day` with default quality
  pub fn on(exercise_id: i64, weight: &str, reps: &str, day: NaiveDate) -> Self {
    Self {
      exercise_id,
      weight: weight.to_string(),
      reps: reps.to_string(),
      date: format_day_token(day),
      cycle_id: None,
      technique: None,
      quality: 5,
    }
  }

  pub fn with_technique(mut self, technique: &str) -> Self {
    self.technique = Some(technique.to_string());
    self
  }

  pub fn with_quality(mut self, quality: i64) -> Self {
    self.quality = quality.clamp(1, 5);
    self
  }
}
