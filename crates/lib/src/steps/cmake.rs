//! CMake-driven three-phase library builds.

use tracing::info;

use crate::context::RunContext;
use crate::error::Result;
use crate::libs::LibrarySpec;
use crate::process::ProcessInvocation;
use crate::tools::ToolResolver;

/// Generator passed to every configure step.
const GENERATOR: &str = "Ninja";

/// One CMake-built library: configure, build, install, mark the sentinel.
pub struct CmakeBuild {
  lib: LibrarySpec,
  options: Vec<String>,
}

impl CmakeBuild {
  pub fn new<I, S>(lib: LibrarySpec, options: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      lib,
      options: options.into_iter().map(Into::into).collect(),
    }
  }

  pub fn run(&self, ctx: &RunContext) -> Result<()> {
    if self.lib.is_cached() {
      info!(id = %self.lib.id, "already installed, skipping");
      return Ok(());
    }

    let resolver = ToolResolver::from_context(ctx);
    let cmake = match &ctx.cmake_override {
      Some(path) => resolver.resolve(&path.to_string_lossy())?,
      None => resolver.resolve("cmake")?,
    };

    info!(id = %self.lib.id, "configuring");
    ProcessInvocation::new(&cmake, &ctx.root)
      .arg("-S")
      .arg_path(&self.lib.source_dir)
      .arg("-B")
      .arg_path(&self.lib.build_dir)
      .arg("-G")
      .arg(GENERATOR)
      .arg(format!("-DCMAKE_TOOLCHAIN_FILE={}", ctx.toolchain_file().display()))
      .arg(format!("-DCMAKE_BUILD_TYPE={}", ctx.config.cmake_build_type()))
      .arg(format!("-DCMAKE_INSTALL_PREFIX={}", self.lib.install_dir.display()))
      .args(self.options.iter().cloned())
      .run(&ctx.platform)?;

    info!(id = %self.lib.id, "building");
    ProcessInvocation::new(&cmake, &ctx.root)
      .arg("--build")
      .arg_path(&self.lib.build_dir)
      .run(&ctx.platform)?;

    info!(id = %self.lib.id, "installing");
    ProcessInvocation::new(&cmake, &ctx.root)
      .arg("--install")
      .arg_path(&self.lib.build_dir)
      .run(&ctx.platform)?;

    self.lib.mark_cached()
  }
}
