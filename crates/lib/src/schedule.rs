//! Schedule expressions for a managed scheduler.
//!
//! A [`Schedule`] is an opaque string in one of two forms:
//!
//! - `rate(<n> <unit>)`, e.g. `rate(1 hour)` or `rate(90 minutes)`
//! - `cron(<minute> <hour> <day> <month> <weekDay> <year>)`
//!
//! Both are validated when built; nothing is checked later.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const MINUTES_PER_HOUR: u64 = 60;
const MINUTES_PER_DAY: u64 = 24 * MINUTES_PER_HOUR;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
  #[error("cannot set both 'day' and 'weekDay' in a cron expression")]
  ConflictingFields,

  #[error("invalid rate duration: {0}")]
  InvalidDuration(String),
}

/// A rate or cron expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule {
  expression_string: String,
}

impl Schedule {
  /// Use a literal expression as-is.
  pub fn expression(expression: impl Into<String>) -> Self {
    Self {
      expression_string: expression.into(),
    }
  }

  /// A schedule that fires every `duration`.
  ///
  /// The duration is expressed in the largest unit (days, hours or minutes)
  /// that divides it exactly.
  ///
  /// # Errors
  ///
  /// Fails on a zero duration or one that is not a whole number of minutes.
  pub fn rate(duration: Duration) -> Result<Self, ScheduleError> {
    if duration.is_zero() {
      return Err(ScheduleError::InvalidDuration("duration cannot be 0".to_string()));
    }
    if duration.subsec_nanos() != 0 || duration.as_secs() % 60 != 0 {
      return Err(ScheduleError::InvalidDuration(format!(
        "{duration:?} is not a whole number of minutes"
      )));
    }

    let minutes = duration.as_secs() / 60;
    let (count, unit) = if minutes % MINUTES_PER_DAY == 0 {
      (minutes / MINUTES_PER_DAY, "day")
    } else if minutes % MINUTES_PER_HOUR == 0 {
      (minutes / MINUTES_PER_HOUR, "hour")
    } else {
      (minutes, "minute")
    };
    let plural = if count == 1 { "" } else { "s" };

    Ok(Self::expression(format!("rate({count} {unit}{plural})")))
  }

  /// A schedule from cron fields.
  ///
  /// Unset fields match every value, except `day` and `week_day`, which are
  /// left unspecified (`?`) unless given.
  ///
  /// # Errors
  ///
  /// Fails with [`ScheduleError::ConflictingFields`] if both `day` and
  /// `week_day` are set.
  pub fn cron(options: CronOptions) -> Result<Self, ScheduleError> {
    if options.day.is_some() && options.week_day.is_some() {
      return Err(ScheduleError::ConflictingFields);
    }

    let minute = options.minute.as_deref().unwrap_or("*");
    let hour = options.hour.as_deref().unwrap_or("*");
    let day = options.day.as_deref().unwrap_or("?");
    let month = options.month.as_deref().unwrap_or("*");
    let week_day = options.week_day.as_deref().unwrap_or("?");
    let year = options.year.as_deref().unwrap_or("*");

    Ok(Self::expression(format!(
      "cron({minute} {hour} {day} {month} {week_day} {year})"
    )))
  }

  pub fn expression_string(&self) -> &str {
    &self.expression_string
  }
}

impl fmt::Display for Schedule {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.expression_string)
  }
}

/// Fields of a cron expression. `None` means "use the default".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CronOptions {
  pub minute: Option<String>,
  pub hour: Option<String>,
  /// Day of the month.
  pub day: Option<String>,
  pub month: Option<String>,
  pub year: Option<String>,
  /// Day of the week, e.g. `MON`.
  pub week_day: Option<String>,
}

impl CronOptions {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn minute(mut self, minute: impl Into<String>) -> Self {
    self.minute = Some(minute.into());
    self
  }

  pub fn hour(mut self, hour: impl Into<String>) -> Self {
    self.hour = Some(hour.into());
    self
  }

  pub fn day(mut self, day: impl Into<String>) -> Self {
    self.day = Some(day.into());
    self
  }

  pub fn month(mut self, month: impl Into<String>) -> Self {
    self.month = Some(month.into());
    self
  }

  pub fn year(mut self, year: impl Into<String>) -> Self {
    self.year = Some(year.into());
    self
  }

  pub fn week_day(mut self, week_day: impl Into<String>) -> Self {
    self.week_day = Some(week_day.into());
    self
  }
}
