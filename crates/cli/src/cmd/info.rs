//! Implementation of the `stbuild info` command.

use anyhow::Result;

use stbuild_lib::context::RunContext;

use crate::output;

/// Print the resolved run context, either human-readable or as JSON.
pub fn cmd_info(ctx: &RunContext, json: bool) -> Result<()> {
  if json {
    return output::print_json(ctx);
  }

  println!("stbuild v{}", env!("CARGO_PKG_VERSION"));
  println!();
  output::print_stat("Root", &ctx.root.display().to_string());
  output::print_stat("Configuration", ctx.config.as_str());
  output::print_stat("Platform", &ctx.platform.to_string());
  output::print_stat("Install prefix", &ctx.install_dir().display().to_string());
  output::print_stat("Native artifacts", &ctx.native_artifact_dir().display().to_string());
  output::print_stat("Sample", if ctx.build_sample { "enabled" } else { "disabled" });
  if let Some(hint) = &ctx.tool_prefer {
    output::print_stat("Tool preference", hint);
  }

  Ok(())
}
