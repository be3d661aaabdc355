//! Resolution of deferred values in a manifest tree.
//!
//! [`resolve`] rewrites a [`ManifestValue`] tree into a new tree in which every
//! [`ManifestValue::Deferred`] has been replaced by the value its placeholder
//! stands for. Map key order and sequence order are preserved and the input is
//! never modified.
//!
//! A placeholder may produce a value that contains further placeholders; those
//! are resolved in turn, up to [`MAX_RESOLVE_DEPTH`] levels.

use thiserror::Error;

use crate::consts::MAX_RESOLVE_DEPTH;
use crate::placeholder::{PlaceholderError, Resolver};
use crate::value::{ManifestMap, ManifestValue};

/// A placeholder that could not be resolved, and where it was found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot resolve value at {path}: {source}")]
pub struct ResolveError {
  /// Location of the placeholder, e.g. `spec.containers[0].image`.
  pub path: String,
  #[source]
  pub source: PlaceholderError,
}

#[derive(Debug, Clone)]
enum PathSegment {
  Key(String),
  Index(usize),
}

/// Resolve every placeholder in `value`.
///
/// # Errors
///
/// Returns a [`ResolveError`] naming the location of the first placeholder
/// that fails to resolve.
pub fn resolve(value: &ManifestValue, resolver: &dyn Resolver) -> Result<ManifestValue, ResolveError> {
  let mut path = Vec::new();
  resolve_at(value, resolver, &mut path, 0)
}

fn resolve_at(
  value: &ManifestValue,
  resolver: &dyn Resolver,
  path: &mut Vec<PathSegment>,
  depth: usize,
) -> Result<ManifestValue, ResolveError> {
  match value {
    ManifestValue::Map(map) => {
      let mut out = ManifestMap::with_capacity(map.len());
      for (key, child) in map {
        path.push(PathSegment::Key(key.clone()));
        let resolved = resolve_at(child, resolver, path, depth)?;
        path.pop();
        out.insert(key.clone(), resolved);
      }
      Ok(ManifestValue::Map(out))
    }
    ManifestValue::Seq(items) => {
      let mut out = Vec::with_capacity(items.len());
      for (index, child) in items.iter().enumerate() {
        path.push(PathSegment::Index(index));
        let resolved = resolve_at(child, resolver, path, depth)?;
        path.pop();
        out.push(resolved);
      }
      Ok(ManifestValue::Seq(out))
    }
    ManifestValue::Deferred(placeholder) => {
      if depth >= MAX_RESOLVE_DEPTH {
        return Err(ResolveError {
          path: format_path(path),
          source: PlaceholderError::TooDeep(MAX_RESOLVE_DEPTH),
        });
      }
      let produced = placeholder.evaluate(resolver).map_err(|source| ResolveError {
        path: format_path(path),
        source,
      })?;
      resolve_at(&produced, resolver, path, depth + 1)
    }
    scalar => Ok(scalar.clone()),
  }
}

fn format_path(path: &[PathSegment]) -> String {
  if path.is_empty() {
    return "(root)".to_string();
  }

  let mut out = String::new();
  for segment in path {
    match segment {
      PathSegment::Key(key) => {
        if !out.is_empty() {
          out.push('.');
        }
        out.push_str(key);
      }
      PathSegment::Index(index) => out.push_str(&format!("[{index}]")),
    }
  }
  out
}
