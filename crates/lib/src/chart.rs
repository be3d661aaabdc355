//! Charts and manifest synthesis.
//!
//! A [`Chart`] is a construct whose subtree is emitted as one multi-document
//! YAML file named `<unique-id>.k8s.yaml`. Synthesis walks the subtree in
//! pre-order and, for every API object:
//!
//! 1. renders its manifest
//! 2. resolves placeholders against the tree
//! 3. removes nulls and empty containers
//! 4. checks that `apiVersion` and `kind` survived
//! 5. encodes it as a YAML document
//!
//! Documents are joined with `---` lines. The whole file is built in memory
//! and written in one step, so a failed synthesis leaves nothing behind.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

use crate::consts::{DOCUMENT_SEPARATOR, MANIFEST_FILE_SUFFIX, PATH_SEP, REQUIRED_FIELDS};
use crate::placeholder::{PlaceholderError, Resolver};
use crate::prune::remove_empty;
use crate::resolve::{ResolveError, resolve};
use crate::tree::{ConstructTree, NodeId, NodeKind, Tree, TreeError};
use crate::util::names;
use crate::value::ManifestValue;

/// Errors that can occur during synthesis.
#[derive(Debug, Error)]
pub enum SynthError {
  #[error(transparent)]
  Tree(#[from] TreeError),

  #[error("failed to resolve '{object}': {source}")]
  Resolve {
    object: String,
    #[source]
    source: ResolveError,
  },

  #[error("'{object}' has no '{field}' left after removing empty values")]
  MissingRequiredField { object: String, field: &'static str },

  #[error("failed to encode manifest: {0}")]
  Serialize(#[from] serde_yaml::Error),

  #[error("failed to create output directory {}: {source}", path.display())]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to write manifest {}: {source}", path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// A construct synthesized into its own manifest file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chart {
  node: NodeId,
  unique_id: String,
  manifest_file: String,
}

impl Chart {
  /// Declare a chart with id `id` under `scope`.
  ///
  /// The manifest file name is fixed here, from the chart's unique id.
  pub fn new(tree: &mut Tree, scope: NodeId, id: &str) -> Result<NodeId, TreeError> {
    tree.validate_child_id(scope, id)?;

    let mut path = tree.path(scope)?;
    path.push(id.to_string());
    let unique_id = names::unique_id(&path).ok_or_else(|| TreeError::NoUniqueId(path.join(PATH_SEP)))?;
    let manifest_file = format!("{unique_id}{MANIFEST_FILE_SUFFIX}");

    tree.add_node(scope, id, |node| {
      NodeKind::Chart(Chart {
        node,
        unique_id,
        manifest_file,
      })
    })
  }

  pub fn node(&self) -> NodeId {
    self.node
  }

  pub fn unique_id(&self) -> &str {
    &self.unique_id
  }

  /// File name of the synthesized manifest, e.g. `web.k8s.yaml`.
  pub fn manifest_file(&self) -> &str {
    &self.manifest_file
  }

  /// Resolve, prune and encode every API object in the chart's subtree.
  ///
  /// Documents come out in pre-order: declaration order, with nested scopes
  /// expanded in place.
  pub fn to_documents<T: ConstructTree + ?Sized>(&self, tree: &T) -> Result<Vec<serde_yaml::Value>, SynthError> {
    let context = SynthContext::new(tree);
    let mut documents = Vec::new();

    for node in tree.find_all(self.node)? {
      let Some(object) = tree.api_object(node)? else {
        continue;
      };
      let object_path = tree.path(node)?.join(PATH_SEP);
      debug!(chart = %self.unique_id, object = %object_path, kind = %object.kind(), "rendering api object");

      let resolved = resolve(&object.render(), &context).map_err(|source| SynthError::Resolve {
        object: object_path.clone(),
        source,
      })?;
      let manifest = remove_empty(&resolved).unwrap_or_default();
      check_required_fields(&manifest, &object_path)?;

      // serde_yaml's owned value model has no anchors, so each occurrence of a
      // shared value is written out in full
      documents.push(serde_yaml::to_value(&manifest)?);
    }

    Ok(documents)
  }

  /// Render the full manifest file contents.
  ///
  /// Returns an empty string for a chart without API objects.
  pub fn to_yaml<T: ConstructTree + ?Sized>(&self, tree: &T) -> Result<String, SynthError> {
    let documents = self.to_documents(tree)?;
    let rendered = documents
      .iter()
      .map(|document| serde_yaml::to_string(document))
      .collect::<Result<Vec<_>, _>>()?;
    Ok(rendered.join(DOCUMENT_SEPARATOR))
  }

  /// Synthesize the chart into `outdir`.
  ///
  /// The directory must exist. The file is written to a temporary file in
  /// `outdir` and persisted under its final name, so readers never see a
  /// partial manifest. The temporary file is removed if any step fails.
  ///
  /// # Returns
  ///
  /// The path of the written manifest.
  pub fn synthesize<T: ConstructTree + ?Sized>(&self, tree: &T, outdir: &Path) -> Result<PathBuf, SynthError> {
    let content = self.to_yaml(tree)?;
    let path = outdir.join(&self.manifest_file);
    let write_error = |source| SynthError::Write {
      path: path.clone(),
      source,
    };

    let mut file = NamedTempFile::new_in(outdir).map_err(write_error)?;
    file.write_all(content.as_bytes()).map_err(write_error)?;
    file.persist(&path).map_err(|err| write_error(err.error))?;

    info!(chart = %self.unique_id, path = ?path, bytes = content.len(), "wrote manifest");
    Ok(path)
  }
}

fn check_required_fields(manifest: &ManifestValue, object: &str) -> Result<(), SynthError> {
  for field in REQUIRED_FIELDS {
    let present = manifest
      .get(field)
      .and_then(ManifestValue::as_str)
      .is_some_and(|value| !value.is_empty());
    if !present {
      return Err(SynthError::MissingRequiredField {
        object: object.to_string(),
        field,
      });
    }
  }
  Ok(())
}

/// Resolves placeholders against a construct tree during synthesis.
pub struct SynthContext<'a, T: ConstructTree + ?Sized> {
  tree: &'a T,
}

impl<'a, T: ConstructTree + ?Sized> SynthContext<'a, T> {
  pub fn new(tree: &'a T) -> Self {
    Self { tree }
  }
}

impl<T: ConstructTree + ?Sized> Resolver for SynthContext<'_, T> {
  fn object_name(&self, node: NodeId) -> Result<ManifestValue, PlaceholderError> {
    let object = self
      .tree
      .api_object(node)?
      .ok_or_else(|| PlaceholderError::NotAnApiObject(self.tree.path(node).unwrap_or_default().join(PATH_SEP)))?;

    match object.explicit_name() {
      Some(name) => Ok(name.clone()),
      None => Ok(ManifestValue::String(names::dns_label(&self.tree.path(node)?))),
    }
  }

  fn unique_id(&self, node: NodeId) -> Result<String, PlaceholderError> {
    Ok(self.tree.unique_id(node)?)
  }

  fn path(&self, node: NodeId) -> Result<String, PlaceholderError> {
    Ok(self.tree.path(node)?.join(PATH_SEP))
  }
}
