//! Per-library build specifications.

use std::path::PathBuf;

use crate::cache;
use crate::consts::GLUE_ID;
use crate::context::RunContext;
use crate::error::Result;

/// Directories of one native library build.
///
/// Constructed once from the run context and never mutated. The install
/// directory is owned by whichever adapter writes to it last: the shared
/// dependency prefix is written by every dependency build, the glue
/// library's artifact root only by the glue build.
#[derive(Debug, Clone)]
pub struct LibrarySpec {
  pub id: String,
  pub source_dir: PathBuf,
  pub build_dir: PathBuf,
  pub install_dir: PathBuf,
}

impl LibrarySpec {
  /// A dependency built from its submodule checkout into the shared prefix.
  pub fn shared(ctx: &RunContext, id: &str) -> Self {
    Self {
      id: id.to_string(),
      source_dir: ctx.dep_source_dir(id),
      build_dir: ctx.build_dir(id),
      install_dir: ctx.install_dir(),
    }
  }

  /// The glue native library, built from `{root}/native` into its own root.
  pub fn glue(ctx: &RunContext) -> Self {
    Self {
      id: GLUE_ID.to_string(),
      source_dir: ctx.native_dir(),
      build_dir: ctx.build_dir(GLUE_ID),
      install_dir: ctx.native_artifact_dir(),
    }
  }

  /// Sentinel file recording a completed install of this library.
  pub fn sentinel_path(&self) -> PathBuf {
    cache::sentinel_path(&self.install_dir, &self.id)
  }

  pub fn is_cached(&self) -> bool {
    cache::is_cached(&self.install_dir, &self.id)
  }

  pub fn mark_cached(&self) -> Result<()> {
    cache::mark_cached(&self.install_dir, &self.id)
  }
}
