//! The root of a construct tree and the entry point for synthesis.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::chart::SynthError;
use crate::consts::{DEFAULT_OUTDIR, OUTDIR_ENV};
use crate::tree::{NodeId, Tree};

/// Options for an [`App`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppOptions {
  /// Directory manifests are written to.
  pub outdir: PathBuf,
}

impl AppOptions {
  /// Options taken from the environment.
  ///
  /// The output directory is read from `CHARTSYNTH_OUTDIR`, falling back to
  /// `dist` when the variable is unset or empty.
  pub fn from_env() -> Self {
    Self {
      outdir: Self::outdir_from_env(),
    }
  }

  pub fn outdir_from_env() -> PathBuf {
    match std::env::var(OUTDIR_ENV) {
      Ok(path) if !path.is_empty() => PathBuf::from(path),
      _ => PathBuf::from(DEFAULT_OUTDIR),
    }
  }

  pub fn with_outdir(mut self, outdir: impl Into<PathBuf>) -> Self {
    self.outdir = outdir.into();
    self
  }
}

impl Default for AppOptions {
  fn default() -> Self {
    Self::from_env()
  }
}

/// Owns the construct tree and writes one manifest per chart.
#[derive(Debug)]
pub struct App {
  tree: Tree,
  outdir: PathBuf,
}

impl Default for App {
  fn default() -> Self {
    Self::new(AppOptions::default())
  }
}

impl App {
  pub fn new(options: AppOptions) -> Self {
    Self {
      tree: Tree::new(),
      outdir: options.outdir,
    }
  }

  pub fn outdir(&self) -> &Path {
    &self.outdir
  }

  /// The root scope, under which charts are declared.
  pub fn root(&self) -> NodeId {
    self.tree.root()
  }

  pub fn tree(&self) -> &Tree {
    &self.tree
  }

  pub fn tree_mut(&mut self) -> &mut Tree {
    &mut self.tree
  }

  /// Synthesize every chart into the output directory.
  ///
  /// The directory is created if needed. Charts are written in pre-order; the
  /// first failure stops synthesis, leaving manifests of earlier charts in
  /// place.
  ///
  /// # Returns
  ///
  /// Paths of the written manifests, in the order they were written.
  pub fn synth(&self) -> Result<Vec<PathBuf>, SynthError> {
    debug!(outdir = ?self.outdir, "creating output directory");
    fs::create_dir_all(&self.outdir).map_err(|source| SynthError::CreateDir {
      path: self.outdir.clone(),
      source,
    })?;

    let charts = self.tree.charts();
    info!(outdir = ?self.outdir, charts = charts.len(), "synthesizing");

    let mut written = Vec::with_capacity(charts.len());
    for node in charts {
      if let Some(chart) = self.tree.chart(node) {
        written.push(chart.synthesize(&self.tree, &self.outdir)?);
      }
    }

    Ok(written)
  }
}
