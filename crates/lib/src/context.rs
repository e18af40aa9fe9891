//! Immutable run configuration.
//!
//! A `RunContext` is constructed once at CLI startup from the parsed
//! command line and passed to every component. Nothing in the orchestration
//! core reads configuration from ambient process state.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use stbuild_platform::Platform;

/// Build configuration selecting optimization level and directory layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildConfig {
  Debug,
  Release,
}

impl BuildConfig {
  /// Name used in directory suffixes (`build-debug`, `install-release`, ...).
  pub const fn as_str(&self) -> &'static str {
    match self {
      BuildConfig::Debug => "debug",
      BuildConfig::Release => "release",
    }
  }

  /// Value passed as `-DCMAKE_BUILD_TYPE=`.
  pub const fn cmake_build_type(&self) -> &'static str {
    match self {
      BuildConfig::Debug => "Debug",
      BuildConfig::Release => "Release",
    }
  }

  /// Value passed as `-Dbuildtype=` to Meson.
  pub const fn meson_buildtype(&self) -> &'static str {
    self.as_str()
  }
}

impl fmt::Display for BuildConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Immutable context for one orchestration run.
#[derive(Debug, Clone, Serialize)]
pub struct RunContext {
  /// Repository root containing the `native/` tree.
  pub root: PathBuf,

  /// Active build configuration.
  pub config: BuildConfig,

  /// Whether the sample program is built as part of `build-all`.
  pub build_sample: bool,

  /// Path override for the cmake executable.
  pub cmake_override: Option<PathBuf>,

  /// Path override for the C compiler the Meson toolchain is derived from.
  pub cc_override: Option<PathBuf>,

  /// Path override for the pipx executable driving Meson.
  pub pipx_override: Option<PathBuf>,

  /// Substring ranking tool candidates into the preferred partition.
  pub tool_prefer: Option<String>,

  /// Capabilities of the platform the run executes on.
  pub platform: Platform,
}

impl RunContext {
  /// Context with defaults for everything but the root and configuration.
  pub fn new(root: impl Into<PathBuf>, config: BuildConfig) -> Self {
    Self {
      root: root.into(),
      config,
      build_sample: false,
      cmake_override: None,
      cc_override: None,
      pipx_override: None,
      tool_prefer: None,
      platform: Platform::current(),
    }
  }

  /// Root of all library build trees for the active configuration.
  pub fn build_root(&self) -> PathBuf {
    self.root.join(format!("build-{}", self.config))
  }

  /// Build tree of one library: `{root}/build-{config}/{id}`.
  pub fn build_dir(&self, id: &str) -> PathBuf {
    self.build_root().join(id)
  }

  /// Shared install prefix of the CMake- and Meson-built dependencies.
  pub fn install_dir(&self) -> PathBuf {
    self.root.join(format!("install-{}", self.config))
  }

  /// Artifact root for the active configuration.
  pub fn artifact_dir(&self) -> PathBuf {
    self.root.join(format!("artifact-{}", self.config))
  }

  /// Install prefix owned by the glue native library.
  pub fn native_artifact_dir(&self) -> PathBuf {
    self.artifact_dir().join("native")
  }

  /// Source tree of the glue library and the dependency submodules.
  pub fn native_dir(&self) -> PathBuf {
    self.root.join("native")
  }

  /// Source checkout of one dependency submodule.
  pub fn dep_source_dir(&self, id: &str) -> PathBuf {
    self.native_dir().join("deps").join(id)
  }

  /// CMake toolchain description file shared by every CMake build.
  pub fn toolchain_file(&self) -> PathBuf {
    self.native_dir().join("toolchain.cmake")
  }

  /// Workspace directory of the runtime build.
  pub fn runtime_dir(&self) -> PathBuf {
    self.root.join("runtime")
  }

  /// Manifest carrying the marker-delimited version region.
  pub fn runtime_manifest(&self) -> PathBuf {
    self.runtime_dir().join("Cargo.toml")
  }

  /// Directory of the sample program.
  pub fn sample_dir(&self) -> PathBuf {
    self.root.join("sample")
  }

  pub fn is_release(&self) -> bool {
    self.config == BuildConfig::Release
  }
}
