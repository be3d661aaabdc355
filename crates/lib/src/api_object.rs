//! Declared Kubernetes API objects.
//!
//! An [`ApiObject`] is one resource in a chart. It is declared with an
//! [`ApiObjectProps`] template and rendered at synthesis time into a
//! [`ManifestValue`] of the shape
//!
//! ```yaml
//! apiVersion: ...
//! kind: ...
//! metadata: { ..., name: ... }
//! spec: ...
//! data: ...
//! <extra fields>
//! ```
//!
//! When no `metadata.name` is declared the object gets a name derived from its
//! path in the construct tree, e.g. `web-deployment-1a2b3c4d`.

use thiserror::Error;

use crate::consts::RESERVED_FIELDS;
use crate::placeholder::Placeholder;
use crate::tree::{NodeId, NodeKind, Tree, TreeError};
use crate::value::{ManifestMap, ManifestValue};

/// Errors raised when declaring an API object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiObjectError {
  #[error("missing required field '{0}'")]
  MissingField(&'static str),

  #[error("field '{field}' must be {expected}")]
  InvalidField { field: &'static str, expected: &'static str },

  #[error("'{0}' is managed by the object and cannot be set as an extra field")]
  ReservedKey(String),

  #[error(transparent)]
  Tree(#[from] TreeError),
}

/// Declaration of an API object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiObjectProps {
  /// API group and version, e.g. `apps/v1`.
  pub api_version: String,
  /// Resource kind, e.g. `Deployment`.
  pub kind: String,
  pub metadata: ManifestMap,
  pub spec: Option<ManifestValue>,
  pub data: Option<ManifestValue>,
  /// Any other top-level fields, emitted after `spec` and `data`.
  pub extra: ManifestMap,
}

impl ApiObjectProps {
  pub fn new(api_version: impl Into<String>, kind: impl Into<String>) -> Self {
    Self {
      api_version: api_version.into(),
      kind: kind.into(),
      ..Self::default()
    }
  }

  pub fn with_metadata(mut self, metadata: ManifestMap) -> Self {
    self.metadata = metadata;
    self
  }

  pub fn with_name(mut self, name: impl Into<ManifestValue>) -> Self {
    self.metadata.insert("name".to_string(), name.into());
    self
  }

  pub fn with_label(mut self, key: impl Into<String>, value: impl Into<ManifestValue>) -> Self {
    let labels = self
      .metadata
      .entry("labels".to_string())
      .or_insert_with(|| ManifestValue::Map(ManifestMap::new()));
    if !matches!(labels, ManifestValue::Map(_)) {
      *labels = ManifestValue::Map(ManifestMap::new());
    }
    if let ManifestValue::Map(labels) = labels {
      labels.insert(key.into(), value.into());
    }
    self
  }

  pub fn with_spec(mut self, spec: impl Into<ManifestValue>) -> Self {
    self.spec = Some(spec.into());
    self
  }

  pub fn with_data(mut self, data: impl Into<ManifestValue>) -> Self {
    self.data = Some(data.into());
    self
  }

  /// Set any other top-level field.
  pub fn with_field(mut self, key: impl Into<String>, value: impl Into<ManifestValue>) -> Self {
    self.extra.insert(key.into(), value.into());
    self
  }

  /// Build props from a plain manifest map.
  ///
  /// `apiVersion` and `kind` must be strings and `metadata`, if present, a
  /// map. `spec` and `data` are picked out; every other key is kept, in
  /// order, as an extra field.
  pub fn from_map(mut map: ManifestMap) -> Result<Self, ApiObjectError> {
    let api_version = take_string(&mut map, "apiVersion")?;
    let kind = take_string(&mut map, "kind")?;

    let metadata = match map.shift_remove("metadata") {
      None | Some(ManifestValue::Null) => ManifestMap::new(),
      Some(ManifestValue::Map(metadata)) => metadata,
      Some(_) => {
        return Err(ApiObjectError::InvalidField {
          field: "metadata",
          expected: "a map",
        });
      }
    };
    let spec = map.shift_remove("spec");
    let data = map.shift_remove("data");

    Ok(Self {
      api_version,
      kind,
      metadata,
      spec,
      data,
      extra: map,
    })
  }

  fn validate(&self) -> Result<(), ApiObjectError> {
    if self.api_version.is_empty() {
      return Err(ApiObjectError::MissingField("apiVersion"));
    }
    if self.kind.is_empty() {
      return Err(ApiObjectError::MissingField("kind"));
    }
    if let Some(key) = self.extra.keys().find(|key| RESERVED_FIELDS.contains(&key.as_str())) {
      return Err(ApiObjectError::ReservedKey(key.clone()));
    }
    Ok(())
  }
}

impl TryFrom<ManifestValue> for ApiObjectProps {
  type Error = ApiObjectError;

  fn try_from(value: ManifestValue) -> Result<Self, Self::Error> {
    match value {
      ManifestValue::Map(map) => Self::from_map(map),
      _ => Err(ApiObjectError::InvalidField {
        field: "(root)",
        expected: "a map",
      }),
    }
  }
}

fn take_string(map: &mut ManifestMap, field: &'static str) -> Result<String, ApiObjectError> {
  match map.shift_remove(field) {
    Some(ManifestValue::String(s)) => Ok(s),
    None | Some(ManifestValue::Null) => Err(ApiObjectError::MissingField(field)),
    Some(_) => Err(ApiObjectError::InvalidField {
      field,
      expected: "a string",
    }),
  }
}

/// A declared API object, owned by its node in the construct tree.
#[derive(Debug, Clone)]
pub struct ApiObject {
  node: NodeId,
  props: ApiObjectProps,
}

impl ApiObject {
  /// Declare an API object with id `id` under `scope`.
  ///
  /// # Errors
  ///
  /// Fails if `apiVersion` or `kind` is empty, if an extra field would
  /// override `apiVersion`, `kind` or `metadata`, or if the id cannot be
  /// registered in the tree.
  pub fn new(tree: &mut Tree, scope: NodeId, id: &str, props: ApiObjectProps) -> Result<NodeId, ApiObjectError> {
    props.validate()?;
    let node = tree.add_node(scope, id, |node| NodeKind::ApiObject(ApiObject { node, props }))?;
    Ok(node)
  }

  pub fn node(&self) -> NodeId {
    self.node
  }

  pub fn api_version(&self) -> &str {
    &self.props.api_version
  }

  pub fn kind(&self) -> &str {
    &self.props.kind
  }

  pub fn props(&self) -> &ApiObjectProps {
    &self.props
  }

  /// The declared `metadata.name`, if any.
  pub fn explicit_name(&self) -> Option<&ManifestValue> {
    self.props.metadata.get("name").filter(|name| !name.is_null())
  }

  /// The object's name: the declared one, or a placeholder for the generated
  /// one.
  ///
  /// Use this to reference the object from another object's manifest.
  pub fn name(&self) -> ManifestValue {
    self
      .explicit_name()
      .cloned()
      .unwrap_or(ManifestValue::Deferred(Placeholder::ObjectName(self.node)))
  }

  /// A deferred reference to the name of the object declared at `node`.
  ///
  /// Resolves to the same string as the object's own `metadata.name`.
  pub fn name_of(node: NodeId) -> ManifestValue {
    ManifestValue::Deferred(Placeholder::ObjectName(node))
  }

  /// Render the unresolved manifest of this object.
  pub fn render(&self) -> ManifestValue {
    let mut metadata = self.props.metadata.clone();
    if self.explicit_name().is_none() {
      metadata.insert("name".to_string(), self.name());
    }

    let mut manifest = ManifestMap::new();
    manifest.insert("apiVersion".to_string(), ManifestValue::from(self.props.api_version.as_str()));
    manifest.insert("kind".to_string(), ManifestValue::from(self.props.kind.as_str()));
    manifest.insert("metadata".to_string(), ManifestValue::Map(metadata));
    if let Some(spec) = &self.props.spec {
      manifest.insert("spec".to_string(), spec.clone());
    }
    if let Some(data) = &self.props.data {
      manifest.insert("data".to_string(), data.clone());
    }
    for (key, value) in &self.props.extra {
      manifest.insert(key.clone(), value.clone());
    }

    ManifestValue::Map(manifest)
  }
}
