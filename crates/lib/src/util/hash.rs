//! Hashing utilities for generated identifiers.
//!
//! This module provides:
//! - `hash_bytes()`: full SHA-256 of arbitrary bytes
//! - `path_hash()`: truncated hash of a construct path

use sha2::{Digest, Sha256};

use crate::consts::{PATH_HASH_LEN, PATH_SEP};

/// Hash arbitrary bytes.
///
/// Returns the full 64-character lowercase hex SHA-256.
pub fn hash_bytes(data: &[u8]) -> String {
  let mut hasher = Sha256::new();
  hasher.update(data);
  hex::encode(hasher.finalize())
}

/// Hash a construct path.
///
/// The components are joined with `/` before hashing, so the result depends
/// on every component, including hidden ones. Only the first
/// [`PATH_HASH_LEN`] hex characters are kept; that is enough to tell apart
/// siblings that sanitize to the same human-readable name.
pub fn path_hash<S: AsRef<str>>(components: &[S]) -> String {
  let joined = components.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(PATH_SEP);
  let full = hash_bytes(joined.as_bytes());
  full[..PATH_HASH_LEN].to_string()
}
