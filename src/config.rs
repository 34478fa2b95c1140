use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::env;
use std::path::PathBuf;

/// ---------------------------------------------------------------------------
/// Configuration Keys
/// ---------------------------------------------------------------------------

pub const DATABASE_PATH_KEY: &str = "LIFT_LOG_DB";
pub const REFERENCE_DATE_KEY: &str = "LIFT_LOG_TODAY";
pub const LOG_FILTER_KEY: &str = "LIFT_LOG_LOG";

const DEFAULT_DATABASE_PATH: &str = "lift-log.db";
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
  pub database_path: PathBuf,
  /// Pins "today" for every date-relative analytic; wall clock when unset
  pub reference_date: Option<NaiveDate>,
  pub log_filter: String,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
      reference_date: None,
      log_filter: DEFAULT_LOG_FILTER.to_string(),
    }
  }
}

impl Config {
  /// Read configuration from the process environment. Unset or blank keys
  /// fall back to defaults.
  pub fn from_env() -> Result<Self, ConfigError> {
    let mut config = Self::default();

    if let Some(path) = non_empty_var(DATABASE_PATH_KEY) {
      config.database_path = PathBuf::from(path);
    }

    if let Some(raw) = non_empty_var(REFERENCE_DATE_KEY) {
      let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| ConfigError::InvalidValue {
        key: REFERENCE_DATE_KEY,
        value: raw.clone(),
      })?;
      config.reference_date = Some(date);
    }

    if let Some(filter) = non_empty_var(LOG_FILTER_KEY) {
      config.log_filter = filter;
    }

    Ok(config)
  }

  pub fn today(&self) -> NaiveDate {
    self
      .reference_date
      .unwrap_or_else(|| Local::now().date_naive())
  }
}

fn non_empty_var(key: &str) -> Option<String> {
  env::var(key)
    .ok()
    .map(|v| v.trim().to_string())
    .filter(|v| !v.is_empty())
}

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Invalid value for {key}: {value:?}")]
  InvalidValue { key: &'static str, value: String },
}

impl Serialize for ConfigError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}
