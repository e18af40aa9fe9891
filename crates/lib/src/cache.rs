//! Sentinel-file cache guard.
//!
//! A library is "already installed" for a configuration exactly when its
//! sentinel file exists under the install directory. The sentinel is empty:
//! it records completion, not the options that produced the artifacts, so a
//! changed option list does not invalidate it (callers clean the tree to
//! force a rebuild).

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::consts::SENTINEL_SUFFIX;
use crate::error::Result;

/// Sentinel path for a library id: `{install}/{id}-installed.lock`.
pub fn sentinel_path(install_dir: &Path, id: &str) -> PathBuf {
  install_dir.join(format!("{}{}", id, SENTINEL_SUFFIX))
}

/// Whether the library is already installed.
///
/// Any error while probing (install directory not created yet, permission
/// trouble, a file where a directory was expected) is treated as "not
/// cached" rather than propagated.
pub fn is_cached(install_dir: &Path, id: &str) -> bool {
  let sentinel = sentinel_path(install_dir, id);
  match sentinel.try_exists() {
    Ok(exists) => exists,
    Err(err) => {
      debug!(path = %sentinel.display(), error = %err, "sentinel probe failed, treating as not cached");
      false
    }
  }
}

/// Record a completed install by creating the empty sentinel.
///
/// Called only after the full configure/build/install sequence succeeded.
pub fn mark_cached(install_dir: &Path, id: &str) -> Result<()> {
  fs::create_dir_all(install_dir)?;
  fs::write(sentinel_path(install_dir, id), b"")?;
  debug!(id, "sentinel written");
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn missing_sentinel_is_not_cached() {
    let temp = TempDir::new().unwrap();
    assert!(!is_cached(temp.path(), "zlib"));
  }

  #[test]
  fn absent_install_dir_is_not_cached() {
    let temp = TempDir::new().unwrap();
    assert!(!is_cached(&temp.path().join("install-debug"), "zlib"));
  }

  #[test]
  fn mark_then_probe() {
    let temp = TempDir::new().unwrap();
    let install = temp.path().join("install-debug");

    mark_cached(&install, "freetype").unwrap();

    assert!(is_cached(&install, "freetype"));
    assert!(sentinel_path(&install, "freetype").exists());
    // Sibling libraries in the same prefix are unaffected.
    assert!(!is_cached(&install, "harfbuzz"));
  }

  #[test]
  fn sentinel_name_shape() {
    assert_eq!(
      sentinel_path(Path::new("/prefix"), "libpng"),
      Path::new("/prefix/libpng-installed.lock")
    );
  }

  #[test]
  #[cfg(unix)]
  fn probe_error_recovered_as_not_cached() {
    // A regular file where the install directory should be makes the probe
    // fail with ENOTDIR, which must not propagate.
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("install-debug");
    std::fs::write(&blocker, b"not a directory").unwrap();

    assert!(!is_cached(&blocker, "zlib"));
  }
}
