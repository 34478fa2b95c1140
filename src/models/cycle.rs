use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TrainingCycle {
  pub id: i64,
  pub name: String,
  pub start_date: String,
  pub end_date: Option<String>,
  pub is_active: bool,
  pub note: Option<String>,
}

/// For inserting new cycles (without id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTrainingCycle {
  pub name: String,
  pub start_date: String,
  pub note: Option<String>,
}
