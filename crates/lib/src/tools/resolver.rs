//! Executable discovery along the search path.
//!
//! Resolution turns a logical tool name ("cmake", "pipx") into an ordered
//! candidate list. Candidates whose path contains the operator-supplied
//! preference hint (a package-manager install prefix, say) form the
//! preferred partition and rank ahead of everything else; within each
//! partition, search-path order is preserved.

use std::env;
use std::path::{Path, PathBuf};

use stbuild_platform::Platform;
use tracing::{debug, trace};

use crate::context::RunContext;
use crate::error::{BuildError, Result};

pub struct ToolResolver<'a> {
  platform: &'a Platform,
  prefer: Option<&'a str>,
}

impl<'a> ToolResolver<'a> {
  pub fn new(platform: &'a Platform, prefer: Option<&'a str>) -> Self {
    Self { platform, prefer }
  }

  pub fn from_context(ctx: &'a RunContext) -> Self {
    Self::new(&ctx.platform, ctx.tool_prefer.as_deref())
  }

  /// Ordered candidate executables for a logical tool name.
  ///
  /// A rooted name short-circuits to itself as the sole candidate. Otherwise
  /// every search-path directory is probed with every platform executable
  /// suffix (as registered and lower-cased); existing matches are collected
  /// in path order and partitioned by the preference hint.
  pub fn candidates(&self, name: &str) -> Vec<PathBuf> {
    let direct = Path::new(name);
    if direct.is_absolute() || direct.has_root() {
      return vec![direct.to_path_buf()];
    }

    let search_path = env::var_os("PATH").unwrap_or_default();
    let suffixes = self.platform.executable_suffixes();

    let mut preferred = Vec::new();
    let mut other = Vec::new();

    for dir in env::split_paths(&search_path) {
      for suffix in &suffixes {
        for file_name in suffix_variants(name, suffix) {
          let candidate = dir.join(&file_name);
          if !candidate.is_file() {
            continue;
          }
          trace!(candidate = %candidate.display(), "found tool candidate");
          if self.is_preferred(&candidate) {
            preferred.push(candidate);
          } else {
            other.push(candidate);
          }
        }
      }
    }

    preferred.extend(other);
    preferred
  }

  /// First candidate, or `ToolNotFound` when the list is empty.
  pub fn resolve(&self, name: &str) -> Result<PathBuf> {
    let resolved = self
      .candidates(name)
      .into_iter()
      .next()
      .ok_or_else(|| BuildError::ToolNotFound { name: name.to_string() })?;
    debug!(name, path = %resolved.display(), "resolved tool");
    Ok(resolved)
  }

  fn is_preferred(&self, candidate: &Path) -> bool {
    match self.prefer {
      Some(hint) => candidate.to_string_lossy().contains(hint),
      None => false,
    }
  }
}

/// File names tried for one suffix: as registered, plus lower-cased when
/// that differs (`tool.EXE` and `tool.exe`).
fn suffix_variants(name: &str, suffix: &str) -> Vec<String> {
  if suffix.is_empty() {
    return vec![name.to_string()];
  }
  let registered = format!("{}{}", name, suffix);
  let lowered = format!("{}{}", name, suffix.to_lowercase());
  if lowered == registered {
    vec![registered]
  } else {
    vec![registered, lowered]
  }
}
