//! Integration tests for chartsynth-lib.

mod app_tests;
mod chart_tests;
mod schedule_tests;
