//! Implementation of the `stbuild update-version-files` command.

use anyhow::{Context, Result};

use stbuild_lib::context::RunContext;
use stbuild_lib::targets;

use crate::output;

pub fn cmd_update(ctx: &RunContext, version: &str) -> Result<()> {
  targets::update_version_files(ctx, version)
    .with_context(|| format!("failed to patch {}", ctx.runtime_manifest().display()))?;

  output::print_success(&format!("runtime manifest set to version {}", version));
  Ok(())
}
