//! Test utilities for chartsynth-lib.
//!
//! A table-driven [`Resolver`] and `proptest` strategies for manifest trees.

use std::collections::HashMap;

use proptest::prelude::*;

use crate::placeholder::{PlaceholderError, Resolver};
use crate::tree::{NodeId, TreeError};
use crate::value::{ManifestMap, ManifestValue};

/// Resolver backed by fixed lookup tables.
#[derive(Default)]
pub struct TestResolver {
  names: HashMap<NodeId, ManifestValue>,
  unique_ids: HashMap<NodeId, String>,
  paths: HashMap<NodeId, String>,
}

impl TestResolver {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_name(mut self, node: NodeId, name: impl Into<ManifestValue>) -> Self {
    self.names.insert(node, name.into());
    self
  }

  pub fn with_unique_id(mut self, node: NodeId, id: &str) -> Self {
    self.unique_ids.insert(node, id.to_string());
    self
  }

  pub fn with_path(mut self, node: NodeId, path: &str) -> Self {
    self.paths.insert(node, path.to_string());
    self
  }
}

impl Resolver for TestResolver {
  fn object_name(&self, node: NodeId) -> Result<ManifestValue, PlaceholderError> {
    self
      .names
      .get(&node)
      .cloned()
      .ok_or(PlaceholderError::Tree(TreeError::UnknownNode(node)))
  }

  fn unique_id(&self, node: NodeId) -> Result<String, PlaceholderError> {
    self
      .unique_ids
      .get(&node)
      .cloned()
      .ok_or(PlaceholderError::Tree(TreeError::UnknownNode(node)))
  }

  fn path(&self, node: NodeId) -> Result<String, PlaceholderError> {
    self
      .paths
      .get(&node)
      .cloned()
      .ok_or(PlaceholderError::Tree(TreeError::UnknownNode(node)))
  }
}

/// Arbitrary placeholder-free manifest trees, nulls and empty containers
/// included.
pub fn arb_concrete_value() -> impl Strategy<Value = ManifestValue> {
  let leaf = prop_oneof![
    Just(ManifestValue::Null),
    any::<bool>().prop_map(ManifestValue::Bool),
    any::<i64>().prop_map(ManifestValue::from),
    "[a-z]{0,6}".prop_map(ManifestValue::from),
  ];

  leaf.prop_recursive(4, 48, 5, |inner| {
    prop_oneof![
      prop::collection::vec(inner.clone(), 0..5).prop_map(ManifestValue::Seq),
      prop::collection::vec(("[a-z]{1,4}", inner), 0..5)
        .prop_map(|entries| ManifestValue::Map(entries.into_iter().collect::<ManifestMap>())),
    ]
  })
}

/// Arbitrary manifest trees with no nulls and no empty containers.
pub fn arb_dense_value() -> impl Strategy<Value = ManifestValue> {
  let leaf = prop_oneof![
    any::<bool>().prop_map(ManifestValue::Bool),
    any::<i64>().prop_map(ManifestValue::from),
    "[a-z]{0,6}".prop_map(ManifestValue::from),
  ];

  leaf.prop_recursive(4, 48, 5, |inner| {
    prop_oneof![
      prop::collection::vec(inner.clone(), 1..5).prop_map(ManifestValue::Seq),
      prop::collection::vec(("[a-z]{1,4}", inner), 1..5)
        .prop_map(|entries| ManifestValue::Map(entries.into_iter().collect::<ManifestMap>())),
    ]
  })
}

/// Returns `true` if the tree contains a null, an empty map or an empty
/// sequence at any depth.
pub fn contains_empty(value: &ManifestValue) -> bool {
  match value {
    ManifestValue::Null => true,
    ManifestValue::Map(map) => map.is_empty() || map.values().any(contains_empty),
    ManifestValue::Seq(items) => items.is_empty() || items.iter().any(contains_empty),
    _ => false,
  }
}
