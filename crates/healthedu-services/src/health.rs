//! Daily health logs.
//!
//! A student has at most one log per day. [`save_today`] looks the day up and
//! updates or inserts accordingly; [`weekly`] reads the last seven days and
//! lays them out as a trend with today in the last slot.

use chrono::{Duration, NaiveDate};
use healthedu_core::{
  StoreExt,
  record::{HealthLog, HealthLogPatch, Mood, Record},
  store::TableStore,
};
use serde::Serialize;

use crate::{Error, Result};

pub const MAX_WATER_GLASSES: u32 = 20;
pub const MAX_SLEEP_HOURS: f64 = 24.0;
pub const MAX_EXERCISE_MINUTES: u32 = 1440;

/// Days covered by [`weekly`], today included.
pub const WEEK: usize = 7;

/// Whether [`save_today`] wrote a new log or changed the existing one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "log", rename_all = "lowercase")]
pub enum Saved {
  Created(HealthLog),
  Updated(HealthLog),
}

impl Saved {
  pub fn log(&self) -> &HealthLog {
    match self {
      Saved::Created(log) | Saved::Updated(log) => log,
    }
  }
}

/// Check an entry against the accepted ranges.
pub fn validate(entry: &HealthLogPatch) -> Result<()> {
  if entry.water_intake > MAX_WATER_GLASSES {
    return Err(Error::InvalidHealthLog(format!(
      "water intake {} exceeds {MAX_WATER_GLASSES} glasses",
      entry.water_intake
    )));
  }
  if !(0.0..=MAX_SLEEP_HOURS).contains(&entry.sleep_hours) {
    return Err(Error::InvalidHealthLog(format!(
      "sleep hours {} outside 0..={MAX_SLEEP_HOURS}",
      entry.sleep_hours
    )));
  }
  if entry.exercise_minutes > MAX_EXERCISE_MINUTES {
    return Err(Error::InvalidHealthLog(format!(
      "exercise minutes {} exceed {MAX_EXERCISE_MINUTES}",
      entry.exercise_minutes
    )));
  }
  Ok(())
}

/// The log for `student_id` on `day`, if any.
pub fn log_for<S>(store: &S, student_id: &str, day: NaiveDate) -> Result<Option<HealthLog>>
where
  S: TableStore + ?Sized,
{
  Ok(
    store
      .from::<HealthLog>()
      .select("*")
      .eq("student_id", student_id)
      .eq("date", day.to_string())
      .maybe_single()?,
  )
}

/// Record `entry` as `student_id`'s log for `today`.
pub fn save_today<S>(
  store: &S,
  student_id: &str,
  today: NaiveDate,
  entry: &HealthLogPatch,
) -> Result<Saved>
where
  S: TableStore + ?Sized,
{
  validate(entry)?;

  match log_for(store, student_id, today)? {
    Some(existing) => {
      let updated = store
        .from::<HealthLog>()
        .update(entry)
        .eq("id", existing.id.as_str())?
        .into_iter()
        .next()
        .ok_or_else(|| healthedu_core::Error::NotFound { table: HealthLog::TABLE.into() })?;
      tracing::info!(student_id, %today, "health log updated");
      Ok(Saved::Updated(updated))
    }
    None => {
      let created = store.from::<HealthLog>().insert(&HealthLog {
        id:               String::new(),
        student_id:       student_id.to_owned(),
        date:             today,
        water_intake:     entry.water_intake,
        sleep_hours:      entry.sleep_hours,
        exercise_minutes: entry.exercise_minutes,
        mood:             entry.mood,
      })?;
      tracing::info!(student_id, %today, "health log created");
      Ok(Saved::Created(created))
    }
  }
}

/// One slot of the weekly trend. Days without a log read as zero with a
/// neutral mood.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayTrend {
  pub date:             NaiveDate,
  pub water_intake:     u32,
  pub sleep_hours:      f64,
  pub exercise_minutes: u32,
  pub mood:             Mood,
}

impl DayTrend {
  fn empty(date: NaiveDate) -> Self {
    Self {
      date,
      water_intake: 0,
      sleep_hours: 0.0,
      exercise_minutes: 0,
      mood: Mood::Neutral,
    }
  }
}

impl From<&HealthLog> for DayTrend {
  fn from(log: &HealthLog) -> Self {
    Self {
      date:             log.date,
      water_intake:     log.water_intake,
      sleep_hours:      log.sleep_hours,
      exercise_minutes: log.exercise_minutes,
      mood:             log.mood,
    }
  }
}

/// The last seven days of logs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyReport {
  /// Logs in `[today - 6, today]`, newest first.
  pub logs:  Vec<HealthLog>,
  /// One slot per day, oldest first and today last.
  pub trend: Vec<DayTrend>,
}

impl WeeklyReport {
  /// Mean of `f` over the days that have a log; zero when there are none.
  pub fn average(&self, f: impl Fn(&HealthLog) -> f64) -> f64 {
    if self.logs.is_empty() {
      return 0.0;
    }
    self.logs.iter().map(f).sum::<f64>() / self.logs.len() as f64
  }
}

/// Read the week ending on `today` for `student_id`.
pub fn weekly<S>(store: &S, student_id: &str, today: NaiveDate) -> Result<WeeklyReport>
where
  S: TableStore + ?Sized,
{
  let start = today - Duration::days(WEEK as i64 - 1);
  let logs = store
    .from::<HealthLog>()
    .select("*")
    .eq("student_id", student_id)
    .gte("date", start.to_string())
    .lte("date", today.to_string())
    .order("date", false)
    .execute()?;

  let trend = (0..WEEK as i64)
    .map(|offset| {
      let day = start + Duration::days(offset);
      // later rows win when a day was logged twice
      logs
        .iter()
        .rev()
        .find(|log| log.date == day)
        .map_or_else(|| DayTrend::empty(day), DayTrend::from)
    })
    .collect();

  tracing::debug!(student_id, %today, logged = logs.len(), "weekly health report");
  Ok(WeeklyReport { logs, trend })
}
