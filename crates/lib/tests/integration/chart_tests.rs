//! Chart synthesis integration tests.

use chartsynth_lib::api_object::{ApiObject, ApiObjectProps};
use chartsynth_lib::chart::SynthError;
use chartsynth_lib::placeholder::PlaceholderError;
use chartsynth_lib::value::{ManifestMap, ManifestValue};
use pretty_assertions::assert_eq;
use serde_json::json;

use super::common::{TestApp, parse_documents, separator_count};

#[test]
fn pod_gets_deterministic_name_and_no_empty_metadata() {
  let synth = || {
    let mut env = TestApp::new();
    let chart = env.chart("web");
    let props = ApiObjectProps::new("v1", "Pod").with_spec(json!({ "containers": [{ "image": "nginx" }] }));
    ApiObject::new(env.app.tree_mut(), chart, "pod", props).unwrap();
    env.app.synth().unwrap();
    env.manifest("web.k8s.yaml")
  };

  let first = synth();
  let docs = parse_documents(&first);

  assert_eq!(docs.len(), 1);
  let name = docs[0]["metadata"]["name"].as_str().unwrap();
  assert!(name.starts_with("web-pod-"), "unexpected name {name}");
  assert_eq!(docs[0]["metadata"].as_mapping().unwrap().len(), 1);
  assert_eq!(first, synth());
}

#[test]
fn document_count_matches_objects() {
  let mut env = TestApp::new();
  let chart = env.chart("test");
  let group = env.app.tree_mut().add_scope(chart, "group").unwrap();
  for (scope, id) in [(chart, "a"), (group, "b"), (group, "c"), (chart, "d")] {
    ApiObject::new(env.app.tree_mut(), scope, id, ApiObjectProps::new("v1", "ConfigMap")).unwrap();
  }

  env.app.synth().unwrap();
  let content = env.manifest("test.k8s.yaml");

  assert_eq!(parse_documents(&content).len(), 4);
  assert_eq!(separator_count(&content), 3);
  assert!(!content.starts_with("---"));
  assert!(!content.trim_end().ends_with("---"));
}

#[test]
fn scoped_objects_get_distinct_names() {
  let mut env = TestApp::new();
  let chart = env.chart("test");
  let scope = env.app.tree_mut().add_scope(chart, "Scope").unwrap();
  ApiObject::new(env.app.tree_mut(), chart, "MyResource", ApiObjectProps::new("v1", "MyResource")).unwrap();
  ApiObject::new(env.app.tree_mut(), scope, "MyResource", ApiObjectProps::new("v1", "MyResource")).unwrap();

  env.app.synth().unwrap();
  let docs = parse_documents(&env.manifest("test.k8s.yaml"));

  assert_ne!(docs[0]["metadata"]["name"], docs[1]["metadata"]["name"]);
}

#[test]
fn explicit_name_spec_and_data_are_emitted_as_declared() {
  let mut env = TestApp::new();
  let chart = env.chart("test");
  let props = ApiObjectProps::new("v1", "ConfigMap")
    .with_name("settings")
    .with_label("app", "web")
    .with_data(json!({ "level": "debug", "retries": 3 }))
    .with_field("immutable", true);
  ApiObject::new(env.app.tree_mut(), chart, "cm", props).unwrap();

  env.app.synth().unwrap();

  assert_eq!(
    env.manifest("test.k8s.yaml"),
    "apiVersion: v1\n\
     kind: ConfigMap\n\
     metadata:\n  name: settings\n  labels:\n    app: web\n\
     data:\n  level: debug\n  retries: 3\n\
     immutable: true\n"
  );
}

#[test]
fn cross_references_are_written_out_in_full() {
  let mut env = TestApp::new();
  let chart = env.chart("test");
  let deployment = ApiObject::new(
    env.app.tree_mut(),
    chart,
    "web",
    ApiObjectProps::new("apps/v1", "Deployment").with_spec(json!({ "replicas": 2 })),
  )
  .unwrap();

  let mut selector = ManifestMap::new();
  selector.insert("app".to_string(), ApiObject::name_of(deployment));
  let selector = ManifestValue::Map(selector);
  let mut spec = ManifestMap::new();
  spec.insert("selector".to_string(), selector.clone());
  spec.insert("extraSelectors".to_string(), ManifestValue::Seq(vec![selector.clone(), selector]));
  ApiObject::new(env.app.tree_mut(), chart, "svc", ApiObjectProps::new("v1", "Service").with_spec(spec)).unwrap();

  env.app.synth().unwrap();
  let content = env.manifest("test.k8s.yaml");
  let docs = parse_documents(&content);

  let name = docs[0]["metadata"]["name"].clone();
  assert_eq!(docs[1]["spec"]["selector"]["app"], name);
  assert_eq!(docs[1]["spec"]["extraSelectors"][1]["app"], name);
  assert!(!content.contains('&') && !content.contains('*'), "aliases in:\n{content}");
}

#[test]
fn resolution_failure_leaves_no_file() {
  let mut env = TestApp::new();
  let chart = env.chart("test");
  let props = ApiObjectProps::new("v1", "Secret")
    .with_data(ManifestValue::lazy(|_| Err(PlaceholderError::Lazy("not ready".to_string()))));
  ApiObject::new(env.app.tree_mut(), chart, "secret", props).unwrap();

  let err = env.app.synth().unwrap_err();

  assert!(matches!(err, SynthError::Resolve { .. }));
  assert!(err.to_string().contains("test/secret"));
  assert!(!env.outdir().join("test.k8s.yaml").exists());
}

#[test]
fn props_from_plain_map() {
  let mut env = TestApp::new();
  let chart = env.chart("test");
  let declared = ManifestValue::from(json!({
    "apiVersion": "batch/v1",
    "kind": "Job",
    "metadata": { "annotations": {} },
    "spec": { "backoffLimit": 0, "template": { "spec": { "volumes": [] } } },
  }));
  let props = ApiObjectProps::try_from(declared).unwrap();
  ApiObject::new(env.app.tree_mut(), chart, "job", props).unwrap();

  env.app.synth().unwrap();
  let docs = parse_documents(&env.manifest("test.k8s.yaml"));

  assert_eq!(docs[0]["spec"], serde_yaml::to_value(json!({ "backoffLimit": 0 })).unwrap());
  assert_eq!(docs[0]["metadata"].as_mapping().unwrap().len(), 1);
}
