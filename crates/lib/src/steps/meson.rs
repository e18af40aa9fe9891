//! Meson-driven library builds.
//!
//! Meson runs through pipx rather than a system install, and setup, compile
//! and install are separate subcommands of one resolved pipx executable.
//! The derived compiler toolchain rides along as environment overrides so
//! Meson-built libraries and CMake-built libraries compile with matching
//! compilers.

use tracing::info;

use crate::context::RunContext;
use crate::error::Result;
use crate::libs::LibrarySpec;
use crate::process::ProcessInvocation;
use crate::tools::{ToolResolver, Toolchain};

/// One Meson-built library: setup, compile, install, mark the sentinel.
pub struct MesonBuild {
  lib: LibrarySpec,
  options: Vec<String>,
  extra_env: Vec<(String, String)>,
}

impl MesonBuild {
  pub fn new<I, S>(lib: LibrarySpec, options: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      lib,
      options: options.into_iter().map(Into::into).collect(),
      extra_env: Vec::new(),
    }
  }

  /// Additional environment override for every phase (PKG_CONFIG_PATH and
  /// the like).
  pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.extra_env.push((key.into(), value.into()));
    self
  }

  pub fn run(&self, ctx: &RunContext) -> Result<()> {
    if self.lib.is_cached() {
      info!(id = %self.lib.id, "already installed, skipping");
      return Ok(());
    }

    let resolver = ToolResolver::from_context(ctx);
    let pipx = match &ctx.pipx_override {
      Some(path) => resolver.resolve(&path.to_string_lossy())?,
      None => resolver.resolve("pipx")?,
    };
    let toolchain = Toolchain::resolve(&resolver, ctx.cc_override.as_deref())?;

    let env: Vec<(String, String)> = toolchain
      .env()
      .into_iter()
      .chain(self.extra_env.iter().cloned())
      .collect();

    info!(id = %self.lib.id, cc = %toolchain.cc.display(), "configuring");
    ProcessInvocation::new(&pipx, &ctx.root)
      .args(["run", "meson", "setup"])
      .arg_path(&self.lib.build_dir)
      .arg_path(&self.lib.source_dir)
      .arg(format!("--prefix={}", self.lib.install_dir.display()))
      .arg(format!("-Dbuildtype={}", ctx.config.meson_buildtype()))
      .args(self.options.iter().cloned())
      .envs(env.iter().cloned())
      .run(&ctx.platform)?;

    info!(id = %self.lib.id, "building");
    ProcessInvocation::new(&pipx, &ctx.root)
      .args(["run", "meson", "compile", "-C"])
      .arg_path(&self.lib.build_dir)
      .envs(env.iter().cloned())
      .run(&ctx.platform)?;

    info!(id = %self.lib.id, "installing");
    ProcessInvocation::new(&pipx, &ctx.root)
      .args(["run", "meson", "install", "-C"])
      .arg_path(&self.lib.build_dir)
      .envs(env.iter().cloned())
      .run(&ctx.platform)?;

    self.lib.mark_cached()
  }
}
