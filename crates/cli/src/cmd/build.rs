//! Generic target execution.
//!
//! Every build-* and restore-* subcommand funnels through here: look the
//! target up in the registry, execute its dependency closure, report the
//! wall-clock time.

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::debug;

use stbuild_lib::context::RunContext;
use stbuild_lib::targets;

use crate::output;

pub fn cmd_build(ctx: &RunContext, target: &str) -> Result<()> {
  output::print_info(&format!("{} ({}, {})", target, ctx.config, ctx.platform));
  debug!(root = %ctx.root.display(), "run context resolved");

  let started = Instant::now();
  let mut graph = targets::registry(ctx);
  graph
    .execute(target)
    .with_context(|| format!("target '{}' failed", target))?;

  output::print_success(&format!(
    "{} finished in {}",
    target,
    output::format_duration(started.elapsed())
  ));
  Ok(())
}
