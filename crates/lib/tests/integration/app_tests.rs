//! App-level integration tests.

use std::path::PathBuf;

use chartsynth_lib::api_object::{ApiObject, ApiObjectProps};
use chartsynth_lib::app::{App, AppOptions};
use chartsynth_lib::chart::Chart;
use chartsynth_lib::consts::OUTDIR_ENV;
use serial_test::serial;
use tempfile::TempDir;

use super::common::TestApp;

#[test]
fn one_manifest_per_chart() {
  let mut env = TestApp::new();
  let frontend = env.chart("frontend");
  let backend = env.chart("backend");
  ApiObject::new(env.app.tree_mut(), frontend, "svc", ApiObjectProps::new("v1", "Service")).unwrap();
  ApiObject::new(env.app.tree_mut(), backend, "db", ApiObjectProps::new("apps/v1", "StatefulSet")).unwrap();

  let written = env.app.synth().unwrap();

  let names: Vec<_> = written
    .iter()
    .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
    .collect();
  assert_eq!(names, vec!["frontend.k8s.yaml", "backend.k8s.yaml"]);
  assert!(env.manifest("backend.k8s.yaml").contains("kind: StatefulSet"));
}

#[test]
#[serial]
fn outdir_comes_from_environment() {
  let temp = TempDir::new().unwrap();
  let outdir = temp.path().join("from-env");

  temp_env::with_var(OUTDIR_ENV, Some(outdir.as_os_str()), || {
    let mut app = App::default();
    let root = app.root();
    Chart::new(app.tree_mut(), root, "test").unwrap();

    assert_eq!(app.synth().unwrap(), vec![outdir.join("test.k8s.yaml")]);
  });
}

#[test]
#[serial]
fn outdir_defaults_to_dist() {
  temp_env::with_var_unset(OUTDIR_ENV, || {
    assert_eq!(App::new(AppOptions::from_env()).outdir(), PathBuf::from("dist"));
  });
}
