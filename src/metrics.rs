//! Metric primitives shared by every analytic
//!
//! Weight and rep counts arrive as free text. Anything that fails to parse
//! counts as zero so a single corrupt record never sinks an aggregate.
//! Day tokens are "DD/MM" with no year; calendar arithmetic borrows the year
//! of whatever reference date the caller supplies. "DD/MM/YYYY" tokens keep
//! their own year.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::models::LoggedSet;

/// ---------------------------------------------------------------------------
/// Lenient Parsing
/// ---------------------------------------------------------------------------

/// Parse a weight entry, accepting a decimal comma ("62,5")
pub fn parse_weight(text: &str) -> f64 {
  let trimmed = text.trim();
  let parsed = trimmed
    .parse::<f64>()
    .or_else(|_| trimmed.replace(',', ".").parse::<f64>());

  match parsed {
    Ok(value) if value.is_finite() => value,
    _ => 0.0,
  }
}

pub fn parse_reps(text: &str) -> i64 {
  text.trim().parse::<i64>().unwrap_or(0)
}

/// weight x reps for a single set
pub fn set_volume(set: &LoggedSet) -> f64 {
  parse_weight(&set.weight) * parse_reps(&set.reps) as f64
}

/// ---------------------------------------------------------------------------
/// Estimated One-Rep-Max
/// ---------------------------------------------------------------------------

/// Epley estimate: w * (1 + r/30), or just w when no reps were done
pub fn epley(weight: f64, reps: f64) -> f64 {
  if reps > 0.0 {
    weight * (1.0 + reps / 30.0)
  } else {
    weight
  }
}

pub fn one_rep_max(weight: &str, reps: &str) -> f64 {
  epley(parse_weight(weight), parse_reps(reps) as f64)
}

/// ---------------------------------------------------------------------------
/// Scheme Parsing ("4x8-12")
/// ---------------------------------------------------------------------------

fn is_times(c: char) -> bool {
  c == 'x' || c == 'X'
}

/// Leading set count of a scheme, 0 when the scheme has none
pub fn target_set_count(scheme: &str) -> u32 {
  let rest = scheme.trim_start();
  let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
  if digits.is_empty() {
    return 0;
  }

  let after = rest[digits.len()..].trim_start();
  if after.starts_with(is_times) {
    digits.parse().unwrap_or(0)
  } else {
    0
  }
}

fn first_digit_run(text: &str) -> Option<u32> {
  let start = text.find(|c: char| c.is_ascii_digit())?;
  let run: String = text[start..]
    .chars()
    .take_while(|c| c.is_ascii_digit())
    .collect();
  run.parse().ok()
}

/// Top of the rep range: the number after the last '-', else after the last 'x'
pub fn target_rep_ceiling(scheme: &str) -> u32 {
  let after_dash = scheme.rfind('-').map(|i| &scheme[i + 1..]);
  let after_times = scheme.rfind(is_times).map(|i| &scheme[i + 1..]);

  after_dash
    .and_then(first_digit_run)
    .or_else(|| after_times.and_then(first_digit_run))
    .unwrap_or(0)
}

/// ---------------------------------------------------------------------------
/// Day Tokens
/// ---------------------------------------------------------------------------

/// Split "DD/MM" or "DD/MM/YYYY" into (day, month, year)
fn parse_day_token(token: &str) -> Option<(u32, u32, Option<i32>)> {
  let mut parts = token.trim().split('/');
  let day: u32 = parts.next()?.trim().parse().ok()?;
  let month: u32 = parts.next()?.trim().parse().ok()?;
  let year: Option<i32> = match parts.next() {
    Some(y) => Some(y.trim().parse().ok()?),
    None => None,
  };
  if parts.next().is_some() {
    return None;
  }

  // 2000 is a leap year, so 29/02 passes here and fails later if needed
  NaiveDate::from_ymd_opt(year.unwrap_or(2000), month, day)?;
  Some((day, month, year))
}

/// Chronological sort key for a day token.
///
/// Ordering is (year, month, day). "DD/MM" tokens have no year and all share
/// the current one, so they sort by (month, day) among themselves and ahead
/// of any "DD/MM/YYYY" token. Unparseable tokens sort before every real day;
/// ties fall back to the raw text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DayKey {
  calendar: Option<(Option<i32>, u32, u32)>,
  raw: String,
}

impl DayKey {
  pub fn new(token: &str) -> Self {
    Self {
      calendar: parse_day_token(token).map(|(day, month, year)| (year, month, day)),
      raw: token.to_string(),
    }
  }

  pub fn is_valid(&self) -> bool {
    self.calendar.is_some()
  }
}

/// Resolve a token to a calendar date, borrowing the year from `as_of`
pub fn resolve_date(token: &str, as_of: NaiveDate) -> Option<NaiveDate> {
  let (day, month, year) = parse_day_token(token)?;
  NaiveDate::from_ymd_opt(year.unwrap_or(as_of.year()), month, day)
}

pub fn format_day_token(date: NaiveDate) -> String {
  date.format("%d/%m").to_string()
}

/// ---------------------------------------------------------------------------
/// Sessions: sets grouped by day
/// ---------------------------------------------------------------------------

/// All sets logged under one day token
#[derive(Debug, Clone)]
pub struct Session<'a> {
  pub date: String,
  /// Ordered by set id
  pub sets: Vec<&'a LoggedSet>,
}

impl Session<'_> {
  pub fn volume(&self) -> f64 {
    self.sets.iter().map(|s| set_volume(s)).sum()
  }

  pub fn max_weight(&self) -> f64 {
    self
      .sets
      .iter()
      .map(|s| parse_weight(&s.weight))
      .fold(0.0, f64::max)
  }

  pub fn total_reps(&self) -> i64 {
    self.sets.iter().map(|s| parse_reps(&s.reps)).sum()
  }

  pub fn mean_quality(&self) -> f64 {
    if self.sets.is_empty() {
      return 0.0;
    }
    self.sets.iter().map(|s| s.quality as f64).sum::<f64>() / self.sets.len() as f64
  }
}

/// Group sets by day token, oldest day first
pub fn sessions(sets: &[LoggedSet]) -> Vec<Session<'_>> {
  let mut grouped: BTreeMap<DayKey, Vec<&LoggedSet>> = BTreeMap::new();
  for set in sets {
    grouped.entry(DayKey::new(&set.date)).or_default().push(set);
  }

  grouped
    .into_iter()
    .map(|(key, mut day_sets)| {
      day_sets.sort_by_key(|s| s.id);
      Session {
        date: key.raw,
        sets: day_sets,
      }
    })
    .collect()
}

/// Sets in id order, the canonical iteration order for aggregates
pub fn by_id(sets: &[LoggedSet]) -> Vec<&LoggedSet> {
  let mut ordered: Vec<&LoggedSet> = sets.iter().collect();
  ordered.sort_by_key(|s| s.id);
  ordered
}

pub fn total_volume(sets: &[LoggedSet]) -> f64 {
  by_id(sets).into_iter().map(set_volume).sum()
}

pub fn max_weight(sets: &[LoggedSet]) -> f64 {
  sets
    .iter()
    .map(|s| parse_weight(&s.weight))
    .fold(0.0, f64::max)
}

pub fn distinct_days(sets: &[LoggedSet]) -> usize {
  sessions(sets).len()
}
