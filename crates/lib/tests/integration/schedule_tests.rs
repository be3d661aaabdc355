//! Schedule expression integration tests.

use std::time::Duration;

use chartsynth_lib::schedule::{CronOptions, Schedule, ScheduleError};

#[test]
fn rate_scenarios() {
  assert_eq!(Schedule::rate(Duration::from_secs(90 * 60)).unwrap().to_string(), "rate(90 minutes)");
  assert_eq!(Schedule::rate(Duration::from_secs(60 * 60)).unwrap().to_string(), "rate(1 hour)");
  assert!(matches!(
    Schedule::rate(Duration::from_secs(0)),
    Err(ScheduleError::InvalidDuration(_))
  ));
}

#[test]
fn cron_scenarios() {
  assert_eq!(
    Schedule::cron(CronOptions::new().day("1").week_day("MON")).unwrap_err(),
    ScheduleError::ConflictingFields
  );
  assert_eq!(
    Schedule::cron(CronOptions::new().minute("0").hour("12")).unwrap().to_string(),
    "cron(0 12 ? * ? *)"
  );
}
