//! Post-install artifact staging.

use std::io;
use std::path::Path;

use tracing::{debug, info};

use crate::error::Result;

/// Ensure `expected` exists, aliasing `actual` through a symbolic link when
/// it does not.
///
/// Used after an adapter completes when a library installs its static
/// archive under a different name than downstream find scripts look for.
/// The alias is always a symbolic link; there is no copy fallback, so
/// platforms or filesystems that forbid symlink creation fail here with the
/// underlying I/O error. Known limitation.
pub fn stage_artifact(expected: &Path, actual: &Path) -> Result<()> {
  if expected.try_exists().unwrap_or(false) {
    debug!(path = %expected.display(), "expected artifact already present");
    return Ok(());
  }

  symlink_file(actual, expected)?;
  info!(link = %expected.display(), target = %actual.display(), "staged artifact alias");
  Ok(())
}

#[cfg(unix)]
fn symlink_file(actual: &Path, expected: &Path) -> io::Result<()> {
  std::os::unix::fs::symlink(actual, expected)
}

#[cfg(windows)]
fn symlink_file(actual: &Path, expected: &Path) -> io::Result<()> {
  // Requires developer mode or elevation; the error propagates when neither
  // is available.
  std::os::windows::fs::symlink_file(actual, expected)
}
