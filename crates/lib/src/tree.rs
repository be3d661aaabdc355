//! In-memory construct tree.
//!
//! Charts, API objects and plain grouping scopes are registered as nodes of a
//! [`Tree`]. Every node has an id that is unique among its siblings; the ids
//! from the root down form the node's path, from which unique ids and default
//! object names are derived.
//!
//! Synthesis only needs a few read operations on the tree. They are captured by
//! the [`ConstructTree`] trait so the chart pipeline does not depend on this
//! particular arena.

use std::fmt;

use thiserror::Error;

use crate::api_object::ApiObject;
use crate::chart::Chart;
use crate::consts::PATH_SEP;
use crate::util::names;

/// Handle to a node in a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl fmt::Display for NodeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

/// Errors raised while building or querying the tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
  #[error("unknown construct {0}")]
  UnknownNode(NodeId),

  #[error("construct id cannot be empty")]
  EmptyId,

  #[error("construct id '{0}' cannot contain '/'")]
  InvalidId(String),

  #[error("there is already a construct with id '{id}' in '{scope}'")]
  DuplicateId { scope: String, id: String },

  #[error("construct '{0}' has no unique id")]
  NoUniqueId(String),
}

/// What a node represents.
#[derive(Debug)]
pub enum NodeKind {
  Root,
  /// A grouping construct with no output of its own.
  Scope,
  Chart(Chart),
  ApiObject(ApiObject),
}

#[derive(Debug)]
pub struct Node {
  id: String,
  parent: Option<NodeId>,
  children: Vec<NodeId>,
  kind: NodeKind,
}

impl Node {
  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn parent(&self) -> Option<NodeId> {
    self.parent
  }

  /// Children in declaration order.
  pub fn children(&self) -> &[NodeId] {
    &self.children
  }

  pub fn kind(&self) -> &NodeKind {
    &self.kind
  }
}

/// Read access to a construct tree, as needed by synthesis.
pub trait ConstructTree {
  /// All nodes in the subtree rooted at `from`, `from` included, in
  /// pre-order.
  fn find_all(&self, from: NodeId) -> Result<Vec<NodeId>, TreeError>;

  /// Ids from the root (excluded) down to `node`.
  fn path(&self, node: NodeId) -> Result<Vec<String>, TreeError>;

  /// The API object at `node`, if the node is one.
  fn api_object(&self, node: NodeId) -> Result<Option<&ApiObject>, TreeError>;

  /// Unique id of `node`, derived from its path.
  fn unique_id(&self, node: NodeId) -> Result<String, TreeError> {
    let path = self.path(node)?;
    names::unique_id(&path).ok_or_else(|| TreeError::NoUniqueId(path.join(PATH_SEP)))
  }
}

/// Arena-backed construct tree.
#[derive(Debug)]
pub struct Tree {
  nodes: Vec<Node>,
}

impl Default for Tree {
  fn default() -> Self {
    Self::new()
  }
}

impl Tree {
  /// Create a tree holding only the root node.
  pub fn new() -> Self {
    Self {
      nodes: vec![Node {
        id: String::new(),
        parent: None,
        children: Vec::new(),
        kind: NodeKind::Root,
      }],
    }
  }

  pub fn root(&self) -> NodeId {
    NodeId(0)
  }

  pub fn node(&self, node: NodeId) -> Result<&Node, TreeError> {
    self.nodes.get(node.0).ok_or(TreeError::UnknownNode(node))
  }

  /// Add a grouping scope under `scope`.
  pub fn add_scope(&mut self, scope: NodeId, id: &str) -> Result<NodeId, TreeError> {
    self.add_node(scope, id, |_| NodeKind::Scope)
  }

  /// The chart at `node`, if the node is one.
  pub fn chart(&self, node: NodeId) -> Option<&Chart> {
    match self.nodes.get(node.0).map(Node::kind) {
      Some(NodeKind::Chart(chart)) => Some(chart),
      _ => None,
    }
  }

  /// All charts in the tree, in pre-order.
  pub fn charts(&self) -> Vec<NodeId> {
    self
      .preorder(self.root())
      .into_iter()
      .filter(|node| self.chart(*node).is_some())
      .collect()
  }

  /// Path of `node` joined with `/`.
  pub fn path_string(&self, node: NodeId) -> Result<String, TreeError> {
    Ok(self.path(node)?.join(PATH_SEP))
  }

  /// Check that `id` can be used for a new child of `scope`.
  pub(crate) fn validate_child_id(&self, scope: NodeId, id: &str) -> Result<(), TreeError> {
    if id.is_empty() {
      return Err(TreeError::EmptyId);
    }
    if id.contains(PATH_SEP) {
      return Err(TreeError::InvalidId(id.to_string()));
    }

    let parent = self.node(scope)?;
    let taken = parent.children.iter().any(|child| self.nodes[child.0].id == id);
    if taken {
      return Err(TreeError::DuplicateId {
        scope: self.path_string(scope)?,
        id: id.to_string(),
      });
    }

    Ok(())
  }

  /// Register a new node under `scope`.
  ///
  /// `make` receives the id the node will get, so the payload can record it.
  pub(crate) fn add_node(
    &mut self,
    scope: NodeId,
    id: &str,
    make: impl FnOnce(NodeId) -> NodeKind,
  ) -> Result<NodeId, TreeError> {
    self.validate_child_id(scope, id)?;

    let node = NodeId(self.nodes.len());
    self.nodes.push(Node {
      id: id.to_string(),
      parent: Some(scope),
      children: Vec::new(),
      kind: make(node),
    });
    self.nodes[scope.0].children.push(node);

    Ok(node)
  }

  fn preorder(&self, from: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack = vec![from];
    while let Some(node) = stack.pop() {
      out.push(node);
      stack.extend(self.nodes[node.0].children.iter().rev());
    }
    out
  }
}

impl ConstructTree for Tree {
  fn find_all(&self, from: NodeId) -> Result<Vec<NodeId>, TreeError> {
    self.node(from)?;
    Ok(self.preorder(from))
  }

  fn path(&self, node: NodeId) -> Result<Vec<String>, TreeError> {
    let mut ids = Vec::new();
    let mut current = Some(node);
    while let Some(id) = current {
      let entry = self.node(id)?;
      if entry.parent.is_some() {
        ids.push(entry.id.clone());
      }
      current = entry.parent;
    }
    ids.reverse();
    Ok(ids)
  }

  fn api_object(&self, node: NodeId) -> Result<Option<&ApiObject>, TreeError> {
    match self.node(node)?.kind() {
      NodeKind::ApiObject(object) => Ok(Some(object)),
      _ => Ok(None),
    }
  }
}
