//! Placeholders for deferred value resolution.
//!
//! API objects often need values that are only known once the whole construct
//! tree has been declared, the default object name being the main example. A
//! [`Placeholder`] stands in for such a value inside a
//! [`ManifestValue`](crate::value::ManifestValue) tree until a [`Resolver`]
//! supplies it at synthesis time.
//!
//! # Placeholder Kinds
//!
//! - `ObjectName(node)` - the name of an API object (explicit or generated)
//! - `UniqueId(node)` - the unique id of any construct
//! - `Path(node)` - the `/`-joined path of any construct
//! - `Lazy(f)` - an arbitrary value computed by a closure
//!
//! # Example
//!
//! ```
//! use chartsynth_lib::api_object::{ApiObject, ApiObjectProps};
//! use chartsynth_lib::chart::Chart;
//! use chartsynth_lib::tree::Tree;
//! use chartsynth_lib::value::ManifestValue;
//!
//! let mut tree = Tree::new();
//! let root = tree.root();
//! let chart = Chart::new(&mut tree, root, "web").unwrap();
//! ApiObject::new(
//!   &mut tree,
//!   chart,
//!   "config",
//!   ApiObjectProps::new("v1", "ConfigMap").with_data(ManifestValue::lazy(|_| Ok("late".into()))),
//! )
//! .unwrap();
//!
//! let docs = tree.chart(chart).unwrap().to_documents(&tree).unwrap();
//! assert_eq!(docs[0]["data"], serde_yaml::Value::from("late"));
//! ```

use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use crate::tree::{NodeId, TreeError};
use crate::value::ManifestValue;

/// A reference to a value that is resolved at synthesis time.
#[derive(Debug, Clone, PartialEq)]
pub enum Placeholder {
  /// Name of the API object at this node.
  ObjectName(NodeId),

  /// Unique id of the construct at this node.
  UniqueId(NodeId),

  /// Path of the construct at this node.
  Path(NodeId),

  /// Value produced by a closure.
  Lazy(Lazy),
}

impl Placeholder {
  /// Produce the value this placeholder stands for.
  ///
  /// The returned value may itself contain placeholders.
  pub fn evaluate(&self, resolver: &dyn Resolver) -> Result<ManifestValue, PlaceholderError> {
    match self {
      Placeholder::ObjectName(node) => resolver.object_name(*node),
      Placeholder::UniqueId(node) => resolver.unique_id(*node).map(ManifestValue::String),
      Placeholder::Path(node) => resolver.path(*node).map(ManifestValue::String),
      Placeholder::Lazy(lazy) => lazy.produce(resolver),
    }
  }
}

impl fmt::Display for Placeholder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Placeholder::ObjectName(node) => write!(f, "object-name:{node}"),
      Placeholder::UniqueId(node) => write!(f, "unique-id:{node}"),
      Placeholder::Path(node) => write!(f, "path:{node}"),
      Placeholder::Lazy(_) => f.write_str("lazy"),
    }
  }
}

type Producer = dyn Fn(&dyn Resolver) -> Result<ManifestValue, PlaceholderError>;

/// A shareable closure producing a deferred value.
///
/// Clones share the closure; two `Lazy` values are equal only if they share
/// it.
#[derive(Clone)]
pub struct Lazy(Rc<Producer>);

impl Lazy {
  pub fn new<F>(produce: F) -> Self
  where
    F: Fn(&dyn Resolver) -> Result<ManifestValue, PlaceholderError> + 'static,
  {
    Self(Rc::new(produce))
  }

  pub fn produce(&self, resolver: &dyn Resolver) -> Result<ManifestValue, PlaceholderError> {
    (self.0)(resolver)
  }
}

impl fmt::Debug for Lazy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Lazy(..)")
  }
}

impl PartialEq for Lazy {
  fn eq(&self, other: &Self) -> bool {
    Rc::ptr_eq(&self.0, &other.0)
  }
}

/// Errors that can occur while evaluating a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceholderError {
  #[error(transparent)]
  Tree(#[from] TreeError),

  #[error("construct '{0}' is not an API object")]
  NotAnApiObject(String),

  #[error("lazy value failed: {0}")]
  Lazy(String),

  #[error("deferred values nested more than {0} levels deep")]
  TooDeep(usize),
}

/// Supplies the values placeholders stand for.
///
/// Implemented by the chart's synthesis context; tests provide their own.
pub trait Resolver {
  /// Resolve the name of the API object at `node`.
  ///
  /// Returns the explicit `metadata.name` when one was declared (which may
  /// itself be deferred), otherwise the generated name.
  fn object_name(&self, node: NodeId) -> Result<ManifestValue, PlaceholderError>;

  /// Resolve the unique id of the construct at `node`.
  fn unique_id(&self, node: NodeId) -> Result<String, PlaceholderError>;

  /// Resolve the `/`-joined path of the construct at `node`.
  fn path(&self, node: NodeId) -> Result<String, PlaceholderError>;
}
