//! Shared utilities.
//!
//! Hashing and identifier generation used by the construct tree, plus test
//! helpers.

pub mod hash;
pub mod names;

#[cfg(test)]
pub mod testutil;
