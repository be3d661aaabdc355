//! Identifiers generated from construct paths.
//!
//! Two flavours are derived from the same path:
//! - unique ids (`MyChartScopeWebA1B2C3D4`), used for manifest file names
//! - DNS labels (`mychart-scope-web-a1b2c3d4`), used as default object names
//!
//! Components equal to [`HIDDEN_ID`] are left out of the readable part of
//! both, but still contribute to the hash.

use crate::consts::{HIDDEN_ID, MAX_DNS_LABEL_LEN, MAX_UNIQUE_ID_HUMAN_LEN, MAX_UNIQUE_ID_LEN, PATH_HASH_LEN};
use crate::util::hash::path_hash;

/// Compute the unique id of a construct from its path.
///
/// A path with a single visible component yields that component stripped to
/// ASCII alphanumerics. Longer paths yield the stripped components
/// concatenated, followed by an uppercase path hash.
///
/// Returns `None` when the path has no visible component (the root).
pub fn unique_id<S: AsRef<str>>(components: &[S]) -> Option<String> {
  let visible = visible_components(components);
  if visible.is_empty() {
    return None;
  }

  if let [single] = visible.as_slice() {
    let candidate = remove_non_alphanumeric(single);
    if !candidate.is_empty() && candidate.len() <= MAX_UNIQUE_ID_LEN {
      return Some(candidate);
    }
  }

  let hash = path_hash(components).to_uppercase();
  let mut human: String = remove_dupes(&visible)
    .into_iter()
    .map(remove_non_alphanumeric)
    .collect();
  human.truncate(MAX_UNIQUE_ID_HUMAN_LEN);

  Some(format!("{human}{hash}"))
}

/// Compute a DNS-label name for a construct from its path.
///
/// The result is lowercase, contains only `[a-z0-9-]`, always ends with the
/// path hash and never exceeds [`MAX_DNS_LABEL_LEN`] characters.
pub fn dns_label<S: AsRef<str>>(components: &[S]) -> String {
  let hash = path_hash(components);

  let lowered: Vec<String> = visible_components(components)
    .into_iter()
    .map(|c| {
      c.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| ch.to_ascii_lowercase())
        .collect::<String>()
    })
    .filter(|c| !c.is_empty())
    .collect();
  let lowered: Vec<&str> = lowered.iter().map(String::as_str).collect();

  let mut human = remove_dupes(&lowered).join("-");
  let max_human = MAX_DNS_LABEL_LEN - PATH_HASH_LEN - 1;
  if human.len() > max_human {
    human.truncate(max_human);
    human = human.trim_end_matches('-').to_string();
  }

  if human.is_empty() {
    hash
  } else {
    format!("{human}-{hash}")
  }
}

fn visible_components<S: AsRef<str>>(components: &[S]) -> Vec<&str> {
  components
    .iter()
    .map(AsRef::as_ref)
    .filter(|c| *c != HIDDEN_ID)
    .collect()
}

fn remove_non_alphanumeric(s: &str) -> String {
  s.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// Drop components that merely repeat the end of the previous one, so
/// `Web/Web` reads as `Web` and `WebService/Service` as `WebService`.
fn remove_dupes<'a>(components: &[&'a str]) -> Vec<&'a str> {
  let mut out: Vec<&'a str> = Vec::with_capacity(components.len());
  for &component in components {
    if out.last().is_none_or(|prev| !prev.ends_with(component)) {
      out.push(component);
    }
  }
  out
}
