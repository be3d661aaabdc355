//! Manifest value model.
//!
//! A [`ManifestValue`] is the YAML-shaped tree an API object renders to. It
//! mirrors `serde_yaml::Value` with one extra variant,
//! [`ManifestValue::Deferred`], for values that are only known once the whole
//! construct tree has been declared.
//!
//! # Ordering
//!
//! Maps keep insertion order so that emitted documents follow declaration
//! order (`apiVersion`, `kind`, `metadata`, ...), not alphabetical order.
//!
//! # Serialization
//!
//! `ManifestValue` implements [`Serialize`]. Serializing a tree that still
//! contains a `Deferred` value fails; resolve it first.

use indexmap::IndexMap;
use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_yaml::Number;

use crate::placeholder::{Lazy, Placeholder, PlaceholderError, Resolver};

/// Ordered map of manifest fields.
pub type ManifestMap = IndexMap<String, ManifestValue>;

/// A possibly-deferred manifest value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ManifestValue {
  #[default]
  Null,
  Bool(bool),
  Number(Number),
  String(String),
  Map(ManifestMap),
  Seq(Vec<ManifestValue>),
  /// A value computed at synthesis time.
  Deferred(Placeholder),
}

impl ManifestValue {
  /// Create a deferred value produced by `produce` at resolution time.
  ///
  /// The closure may return further deferred values; they are resolved too.
  pub fn lazy<F>(produce: F) -> Self
  where
    F: Fn(&dyn Resolver) -> Result<ManifestValue, PlaceholderError> + 'static,
  {
    ManifestValue::Deferred(Placeholder::Lazy(Lazy::new(produce)))
  }

  pub fn is_null(&self) -> bool {
    matches!(self, ManifestValue::Null)
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      ManifestValue::String(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_map(&self) -> Option<&ManifestMap> {
    match self {
      ManifestValue::Map(map) => Some(map),
      _ => None,
    }
  }

  pub fn as_seq(&self) -> Option<&[ManifestValue]> {
    match self {
      ManifestValue::Seq(items) => Some(items),
      _ => None,
    }
  }

  /// Look up a key when this value is a map.
  pub fn get(&self, key: &str) -> Option<&ManifestValue> {
    self.as_map().and_then(|map| map.get(key))
  }

  /// Returns `true` if no `Deferred` value appears anywhere in the tree.
  pub fn is_concrete(&self) -> bool {
    match self {
      ManifestValue::Deferred(_) => false,
      ManifestValue::Map(map) => map.values().all(ManifestValue::is_concrete),
      ManifestValue::Seq(items) => items.iter().all(ManifestValue::is_concrete),
      _ => true,
    }
  }
}

impl Serialize for ManifestValue {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      ManifestValue::Null => serializer.serialize_unit(),
      ManifestValue::Bool(b) => serializer.serialize_bool(*b),
      ManifestValue::Number(n) => n.serialize(serializer),
      ManifestValue::String(s) => serializer.serialize_str(s),
      ManifestValue::Map(map) => {
        let mut out = serializer.serialize_map(Some(map.len()))?;
        for (key, value) in map {
          out.serialize_entry(key, value)?;
        }
        out.end()
      }
      ManifestValue::Seq(items) => {
        let mut out = serializer.serialize_seq(Some(items.len()))?;
        for item in items {
          out.serialize_element(item)?;
        }
        out.end()
      }
      ManifestValue::Deferred(placeholder) => Err(S::Error::custom(format!(
        "unresolved placeholder: {placeholder}"
      ))),
    }
  }
}

macro_rules! from_number {
  ($($ty:ty)*) => {
    $(
      impl From<$ty> for ManifestValue {
        fn from(n: $ty) -> Self {
          ManifestValue::Number(Number::from(n))
        }
      }
    )*
  };
}

from_number!(i8 i16 i32 i64 isize u8 u16 u32 u64 usize f32 f64);

impl From<bool> for ManifestValue {
  fn from(b: bool) -> Self {
    ManifestValue::Bool(b)
  }
}

impl From<&str> for ManifestValue {
  fn from(s: &str) -> Self {
    ManifestValue::String(s.to_string())
  }
}

impl From<String> for ManifestValue {
  fn from(s: String) -> Self {
    ManifestValue::String(s)
  }
}

impl From<ManifestMap> for ManifestValue {
  fn from(map: ManifestMap) -> Self {
    ManifestValue::Map(map)
  }
}

impl<T: Into<ManifestValue>> From<Vec<T>> for ManifestValue {
  fn from(items: Vec<T>) -> Self {
    ManifestValue::Seq(items.into_iter().map(Into::into).collect())
  }
}

impl<T: Into<ManifestValue>> From<Option<T>> for ManifestValue {
  fn from(value: Option<T>) -> Self {
    value.map_or(ManifestValue::Null, Into::into)
  }
}

impl From<Placeholder> for ManifestValue {
  fn from(placeholder: Placeholder) -> Self {
    ManifestValue::Deferred(placeholder)
  }
}

impl From<serde_json::Value> for ManifestValue {
  fn from(value: serde_json::Value) -> Self {
    match value {
      serde_json::Value::Null => ManifestValue::Null,
      serde_json::Value::Bool(b) => ManifestValue::Bool(b),
      serde_json::Value::Number(n) => {
        if let Some(i) = n.as_i64() {
          i.into()
        } else if let Some(u) = n.as_u64() {
          u.into()
        } else {
          n.as_f64().map_or(ManifestValue::Null, Into::into)
        }
      }
      serde_json::Value::String(s) => ManifestValue::String(s),
      serde_json::Value::Array(items) => ManifestValue::Seq(items.into_iter().map(Into::into).collect()),
      serde_json::Value::Object(map) => ManifestValue::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect()),
    }
  }
}
