//! Error types for the orchestration core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while orchestrating a build run.
///
/// All variants are fatal: the first one raised unwinds to the CLI entry
/// point and terminates the whole run. Cache probe failures are deliberately
/// absent (they are recovered locally as "not cached", see `crate::cache`).
#[derive(Debug, Error)]
pub enum BuildError {
  /// No candidate executable was found for a logical tool name.
  #[error("tool not found on search path: {name}")]
  ToolNotFound { name: String },

  /// A child process exited nonzero (or died to a signal, `code` is None).
  #[error("command failed with exit code {code:?}: {command}")]
  ProcessFailed { command: String, code: Option<i32> },

  /// Target graph traversal revisited a target already on the current path.
  #[error("dependency cycle detected at target '{target}'")]
  DependencyCycle { target: String },

  /// A target (or declared dependency) name is not registered.
  #[error("unknown target: {name}")]
  UnknownTarget { name: String },

  /// A library source directory is absent.
  #[error("source directory for '{id}' is missing: {path} (run restore-submodules first)")]
  MissingSource { id: String, path: PathBuf },

  /// The version markers were not found in the runtime manifest.
  #[error("version markers not found in {path}")]
  MarkersNotFound { path: PathBuf },

  /// I/O error during orchestration.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BuildError>;
