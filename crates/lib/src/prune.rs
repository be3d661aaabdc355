//! Removal of empty structure from resolved manifests.
//!
//! Declarations are usually built from optional pieces, so a rendered object
//! tends to carry `null`s and empty maps (`metadata: { labels: {} }`) that
//! should not appear in the emitted YAML.
//!
//! [`remove_empty`] drops, at every depth:
//! - `Null` values
//! - maps left with no entries
//! - sequences left with no elements
//!
//! Children are pruned before their parent is checked, so a map whose only
//! entry is an empty map disappears entirely. No key is treated specially;
//! callers that need a field to survive must make sure it is non-empty.

use crate::value::{ManifestMap, ManifestValue};

/// Return a copy of `value` without nulls and empty containers.
///
/// Returns `None` when nothing is left. Scalars, including empty strings,
/// `false` and `0`, are kept. Pruning an already pruned value returns it
/// unchanged.
pub fn remove_empty(value: &ManifestValue) -> Option<ManifestValue> {
  match value {
    ManifestValue::Null => None,
    ManifestValue::Map(map) => {
      let pruned: ManifestMap = map
        .iter()
        .filter_map(|(key, child)| remove_empty(child).map(|child| (key.clone(), child)))
        .collect();
      (!pruned.is_empty()).then_some(ManifestValue::Map(pruned))
    }
    ManifestValue::Seq(items) => {
      let pruned: Vec<ManifestValue> = items.iter().filter_map(remove_empty).collect();
      (!pruned.is_empty()).then_some(ManifestValue::Seq(pruned))
    }
    other => Some(other.clone()),
  }
}
