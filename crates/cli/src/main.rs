use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use stbuild_lib::context::{BuildConfig, RunContext};
use stbuild_platform::Platform;

mod cmd;
mod output;

/// stbuild - build orchestrator for the Staccato runtime's native dependencies
#[derive(Parser)]
#[command(name = "stbuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Repository root containing the native/ tree
  #[arg(long, global = true, default_value = ".")]
  root: PathBuf,

  /// Build configuration
  #[arg(short, long, global = true, value_enum, default_value = "debug")]
  config: ConfigArg,

  /// Also build the sample program as part of build-all
  #[arg(long, global = true)]
  sample: bool,

  /// Path override for the cmake executable
  #[arg(long, global = true, value_name = "PATH")]
  cmake: Option<PathBuf>,

  /// Path override for the C compiler the Meson toolchain is derived from
  #[arg(long, global = true, value_name = "PATH")]
  cc: Option<PathBuf>,

  /// Path override for the pipx executable driving Meson
  #[arg(long, global = true, value_name = "PATH")]
  pipx: Option<PathBuf>,

  /// Prefer tool candidates whose path contains this substring
  #[arg(long, global = true, value_name = "SUBSTRING")]
  prefer: Option<String>,

  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ConfigArg {
  Debug,
  Release,
}

impl From<ConfigArg> for BuildConfig {
  fn from(value: ConfigArg) -> Self {
    match value {
      ConfigArg::Debug => BuildConfig::Debug,
      ConfigArg::Release => BuildConfig::Release,
    }
  }
}

#[derive(Subcommand)]
enum Commands {
  /// Sync and update the git submodules
  RestoreSubmodules,
  /// Verify that every native library source checkout is present
  RestoreNative,
  /// Build the zlib compression library
  BuildZlib,
  /// Build the libpng image library
  BuildLibpng,
  /// Build the freetype font library
  BuildFreetype,
  /// Build the harfbuzz shaping library
  BuildHarfbuzz,
  /// Build the SDL windowing library
  BuildSdl,
  /// Build the staccato-native glue library
  BuildNative,
  /// Build the runtime with cargo
  BuildRuntime,
  /// Build the sample program (no-op without --sample)
  BuildSample,
  /// Build everything
  BuildAll,
  /// Remove build, install and artifact trees of the active configuration
  Clean,
  /// Patch the runtime manifest version between its marker lines
  UpdateVersionFiles {
    /// Version string to write
    version: String,
  },
  /// Show the resolved run context
  Info {
    /// Emit JSON
    #[arg(long)]
    json: bool,
  },
}

impl Commands {
  /// Registry target driven by this subcommand, if any.
  fn target_name(&self) -> Option<&'static str> {
    Some(match self {
      Commands::RestoreSubmodules => "restore-submodules",
      Commands::RestoreNative => "restore-native",
      Commands::BuildZlib => "build-zlib",
      Commands::BuildLibpng => "build-libpng",
      Commands::BuildFreetype => "build-freetype",
      Commands::BuildHarfbuzz => "build-harfbuzz",
      Commands::BuildSdl => "build-sdl",
      Commands::BuildNative => "build-native",
      Commands::BuildRuntime => "build-runtime",
      Commands::BuildSample => "build-sample",
      Commands::BuildAll => "build-all",
      Commands::Clean => "clean",
      Commands::UpdateVersionFiles { .. } | Commands::Info { .. } => return None,
    })
  }
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  if let Err(err) = run(cli) {
    output::print_error(&format!("{:#}", err));
    std::process::exit(1);
  }
}

fn run(cli: Cli) -> Result<()> {
  let root = dunce::canonicalize(&cli.root)
    .with_context(|| format!("failed to resolve repository root {}", cli.root.display()))?;

  let ctx = RunContext {
    root,
    config: cli.config.into(),
    build_sample: cli.sample,
    cmake_override: cli.cmake,
    cc_override: cli.cc,
    pipx_override: cli.pipx,
    tool_prefer: cli.prefer,
    platform: Platform::current(),
  };

  match &cli.command {
    Commands::Info { json } => cmd::cmd_info(&ctx, *json),
    Commands::UpdateVersionFiles { version } => cmd::cmd_update(&ctx, version),
    other => {
      let target = other.target_name().expect("subcommand maps to a registry target");
      cmd::cmd_build(&ctx, target)
    }
  }
}

fn init_tracing(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("stbuild=debug,stbuild_lib=debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stbuild=info,stbuild_lib=info"))
  };
  tracing_subscriber::fmt().with_env_filter(filter).without_time().init();
}
