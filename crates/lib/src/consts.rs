//! Crate-wide constants.

/// Suffix appended to a chart's unique id to form its manifest file name.
pub const MANIFEST_FILE_SUFFIX: &str = ".k8s.yaml";

/// Line placed between two YAML documents in a manifest file.
pub const DOCUMENT_SEPARATOR: &str = "---\n";

/// Environment variable overriding the default output directory.
pub const OUTDIR_ENV: &str = "CHARTSYNTH_OUTDIR";

pub const DEFAULT_OUTDIR: &str = "dist";

/// Path separator used when joining construct ids.
pub const PATH_SEP: &str = "/";

/// Construct id that is left out of unique ids and generated names.
pub const HIDDEN_ID: &str = "Default";

/// Number of hex characters of the path hash kept in generated ids and names.
pub const PATH_HASH_LEN: usize = 8;

pub const MAX_UNIQUE_ID_LEN: usize = 255;

/// Longest human-readable prefix of a hashed unique id.
pub const MAX_UNIQUE_ID_HUMAN_LEN: usize = 240;

/// Kubernetes object names must be valid DNS labels.
pub const MAX_DNS_LABEL_LEN: usize = 63;

/// Upper bound on nested deferred values produced while resolving.
pub const MAX_RESOLVE_DEPTH: usize = 64;

/// Top-level keys every emitted document must keep after pruning.
pub const REQUIRED_FIELDS: [&str; 2] = ["apiVersion", "kind"];

/// Top-level keys owned by an API object that extra fields may not override.
pub const RESERVED_FIELDS: [&str; 3] = ["apiVersion", "kind", "metadata"];
