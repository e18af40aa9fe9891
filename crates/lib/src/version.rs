//! Version patching of the runtime dependency manifest.
//!
//! The runtime manifest carries a marker-delimited region; the orchestrator
//! rewrites everything strictly between the two marker lines to a single
//! `version = "..."` line, leaving all text outside the markers untouched.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::consts::{VERSION_END_MARKER, VERSION_START_MARKER};
use crate::error::{BuildError, Result};

/// Replace the content between the first `start_marker` line and the next
/// `end_marker` line with `replacement` (plus a newline). Text outside the
/// markers, the marker lines themselves included, is preserved verbatim.
///
/// Returns `None` when either marker line is absent.
pub fn patch_between_markers(text: &str, start_marker: &str, end_marker: &str, replacement: &str) -> Option<String> {
  let mut offset = 0;
  let mut region_start = None;
  let mut region_end = None;

  for line in text.split_inclusive('\n') {
    let line_start = offset;
    offset += line.len();
    let trimmed = line.trim_end_matches(['\n', '\r']);

    if region_start.is_none() {
      if trimmed == start_marker {
        region_start = Some(offset);
      }
    } else if trimmed == end_marker {
      region_end = Some(line_start);
      break;
    }
  }

  let (start, end) = (region_start?, region_end?);

  let mut patched = String::with_capacity(text.len());
  patched.push_str(&text[..start]);
  patched.push_str(replacement);
  patched.push('\n');
  patched.push_str(&text[end..]);
  Some(patched)
}

/// Patch the version region of the manifest at `path`.
pub fn patch_version_manifest(path: &Path, version: &str) -> Result<()> {
  let text = fs::read_to_string(path)?;
  let replacement = format!("version = \"{}\"", version);

  let patched = patch_between_markers(&text, VERSION_START_MARKER, VERSION_END_MARKER, &replacement).ok_or_else(
    || BuildError::MarkersNotFound {
      path: path.to_path_buf(),
    },
  )?;

  fs::write(path, patched)?;
  info!(path = %path.display(), version, "patched version manifest");
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  const START: &str = "# stbuild:version:start";
  const END: &str = "# stbuild:version:end";

  #[test]
  fn replaces_region_and_preserves_surroundings() {
    let text = "[package]\nname = \"staccato-runtime\"\n# stbuild:version:start\nversion = \"0.0.0\"\n# stbuild:version:end\nedition = \"2024\"\n";

    let patched = patch_between_markers(text, START, END, "version = \"9.9.9\"").unwrap();

    assert_eq!(
      patched,
      "[package]\nname = \"staccato-runtime\"\n# stbuild:version:start\nversion = \"9.9.9\"\n# stbuild:version:end\nedition = \"2024\"\n"
    );
  }

  #[test]
  fn replaces_arbitrary_region_content() {
    let text = format!("{}\nstale line one\nstale line two\n{}\ntail\n", START, END);

    let patched = patch_between_markers(&text, START, END, "version = \"1.2.3\"").unwrap();

    assert_eq!(patched, format!("{}\nversion = \"1.2.3\"\n{}\ntail\n", START, END));
  }

  #[test]
  fn empty_region_gains_version_line() {
    let text = format!("head\n{}\n{}\n", START, END);

    let patched = patch_between_markers(&text, START, END, "version = \"1.2.3\"").unwrap();

    assert_eq!(patched, format!("head\n{}\nversion = \"1.2.3\"\n{}\n", START, END));
  }

  #[test]
  fn patching_is_idempotent() {
    let text = format!("{}\nversion = \"1.0.0\"\n{}\n", START, END);

    let once = patch_between_markers(&text, START, END, "version = \"2.0.0\"").unwrap();
    let twice = patch_between_markers(&once, START, END, "version = \"2.0.0\"").unwrap();

    assert_eq!(once, twice);
  }

  #[test]
  fn missing_markers_return_none() {
    assert!(patch_between_markers("no markers here\n", START, END, "x").is_none());
    assert!(patch_between_markers(&format!("{}\nno end\n", START), START, END, "x").is_none());
    assert!(patch_between_markers(&format!("no start\n{}\n", END), START, END, "x").is_none());
  }

  #[test]
  fn end_marker_before_start_is_rejected() {
    let text = format!("{}\nbetween\n{}\n", END, START);
    assert!(patch_between_markers(&text, START, END, "x").is_none());
  }

  #[test]
  fn manifest_file_roundtrip() {
    let temp = TempDir::new().unwrap();
    let manifest = temp.path().join("Cargo.toml");
    std::fs::write(
      &manifest,
      format!("[package]\nname = \"staccato-runtime\"\n{}\nversion = \"0.1.0\"\n{}\n", START, END),
    )
    .unwrap();

    patch_version_manifest(&manifest, "9.9.9").unwrap();

    let text = std::fs::read_to_string(&manifest).unwrap();
    assert!(text.contains("version = \"9.9.9\""));
    assert!(!text.contains("0.1.0"));
    assert!(text.starts_with("[package]\nname = \"staccato-runtime\"\n"));
  }

  #[test]
  fn manifest_without_markers_fails() {
    let temp = TempDir::new().unwrap();
    let manifest = temp.path().join("Cargo.toml");
    std::fs::write(&manifest, "[package]\nversion = \"0.1.0\"\n").unwrap();

    let err = patch_version_manifest(&manifest, "9.9.9").unwrap_err();
    assert!(matches!(err, BuildError::MarkersNotFound { .. }));
  }
}
