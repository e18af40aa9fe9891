//! The target registry.
//!
//! Declares every orchestration entry point, its upstream dependencies, and
//! the per-library option lists handed to the build step adapters. This is
//! the declarative part of the repository; the machinery lives in `graph`,
//! `steps`, `tools` and `process`.

use std::path::Path;

use stbuild_platform::Os;
use tracing::info;

use crate::consts::{ENV_DEP_PREFIX, ENV_NATIVE_DIR, GLUE_ID};
use crate::context::RunContext;
use crate::error::{BuildError, Result};
use crate::graph::TargetGraph;
use crate::libs::LibrarySpec;
use crate::process::ProcessInvocation;
use crate::steps::{CmakeBuild, MesonBuild, stage_artifact};
use crate::tools::ToolResolver;
use crate::version;

/// Dependency submodule ids under `native/deps/`.
const DEP_IDS: &[&str] = &["zlib", "libpng", "freetype", "harfbuzz", "sdl"];

/// Build the full target registry for one run.
pub fn registry(ctx: &RunContext) -> TargetGraph {
  let mut graph = TargetGraph::new();

  add(&mut graph, ctx, "restore-submodules", &[], restore_submodules);
  add(&mut graph, ctx, "restore-native", &["restore-submodules"], verify_sources);

  add_library(&mut graph, ctx, "build-zlib", &["restore-native"], LibrarySpec::shared(ctx, "zlib"), build_zlib);
  add_library(
    &mut graph,
    ctx,
    "build-libpng",
    &["build-zlib"],
    LibrarySpec::shared(ctx, "libpng"),
    build_libpng,
  );
  add_library(
    &mut graph,
    ctx,
    "build-freetype",
    &["build-zlib", "build-libpng"],
    LibrarySpec::shared(ctx, "freetype"),
    build_freetype,
  );
  add_library(
    &mut graph,
    ctx,
    "build-harfbuzz",
    &["build-freetype"],
    LibrarySpec::shared(ctx, "harfbuzz"),
    build_harfbuzz,
  );
  add_library(&mut graph, ctx, "build-sdl", &["restore-native"], LibrarySpec::shared(ctx, "sdl"), build_sdl);
  add_library(
    &mut graph,
    ctx,
    "build-native",
    &["build-zlib", "build-libpng", "build-freetype", "build-harfbuzz"],
    LibrarySpec::glue(ctx),
    build_native,
  );

  add(&mut graph, ctx, "build-runtime", &["build-native", "build-sdl"], build_runtime);

  {
    let sample = ctx.build_sample;
    let ctx = ctx.clone();
    graph.target_if("build-sample", &["build-runtime"], move || !sample, move || build_sample(&ctx));
  }

  add(&mut graph, ctx, "build-all", &["build-runtime", "build-sample"], |_: &RunContext| {
    info!("all targets complete");
    Ok(())
  });

  add(&mut graph, ctx, "clean", &[], clean);

  graph
}

/// Patch the runtime manifest version. Not part of the registry because it
/// takes the version argument directly.
pub fn update_version_files(ctx: &RunContext, new_version: &str) -> Result<()> {
  version::patch_version_manifest(&ctx.runtime_manifest(), new_version)
}

fn add(graph: &mut TargetGraph, ctx: &RunContext, name: &str, deps: &[&str], action: fn(&RunContext) -> Result<()>) {
  let ctx = ctx.clone();
  graph.target(name, deps, move || action(&ctx));
}

/// Library targets skip outright once the sentinel exists; the predicate is
/// deferred because the sentinel may be written by this very run.
fn add_library(
  graph: &mut TargetGraph,
  ctx: &RunContext,
  name: &str,
  deps: &[&str],
  lib: LibrarySpec,
  action: fn(&RunContext) -> Result<()>,
) {
  let ctx = ctx.clone();
  graph.target_if(name, deps, move || lib.is_cached(), move || action(&ctx));
}

fn restore_submodules(ctx: &RunContext) -> Result<()> {
  let resolver = ToolResolver::from_context(ctx);
  let git = resolver.resolve("git")?;

  ProcessInvocation::new(&git, &ctx.root)
    .args(["submodule", "sync", "--recursive"])
    .run(&ctx.platform)?;
  ProcessInvocation::new(&git, &ctx.root)
    .args(["submodule", "update", "--init", "--recursive"])
    .run(&ctx.platform)
}

fn verify_sources(ctx: &RunContext) -> Result<()> {
  let native = ctx.native_dir();
  if !native.is_dir() {
    return Err(BuildError::MissingSource {
      id: GLUE_ID.to_string(),
      path: native,
    });
  }
  for id in DEP_IDS {
    let path = ctx.dep_source_dir(id);
    if !path.is_dir() {
      return Err(BuildError::MissingSource {
        id: id.to_string(),
        path,
      });
    }
  }
  Ok(())
}

fn build_zlib(ctx: &RunContext) -> Result<()> {
  let lib = LibrarySpec::shared(ctx, "zlib");
  CmakeBuild::new(lib.clone(), ["-DBUILD_SHARED_LIBS=OFF", "-DZLIB_BUILD_EXAMPLES=OFF"]).run(ctx)?;

  // zlib installs its static archive as zlibstatic.lib on the Windows
  // family, while the downstream find scripts look for zlib.lib.
  if ctx.platform.os == Os::Windows {
    let lib_dir = lib.install_dir.join("lib");
    stage_artifact(&lib_dir.join("zlib.lib"), &lib_dir.join("zlibstatic.lib"))?;
  }
  Ok(())
}

fn build_libpng(ctx: &RunContext) -> Result<()> {
  let install = ctx.install_dir();
  CmakeBuild::new(
    LibrarySpec::shared(ctx, "libpng"),
    [
      "-DBUILD_SHARED_LIBS=OFF".to_string(),
      "-DPNG_SHARED=OFF".to_string(),
      "-DPNG_STATIC=ON".to_string(),
      "-DPNG_TESTS=OFF".to_string(),
      "-DPNG_TOOLS=OFF".to_string(),
      format!("-DZLIB_ROOT={}", install.display()),
    ],
  )
  .run(ctx)
}

fn build_freetype(ctx: &RunContext) -> Result<()> {
  let install = ctx.install_dir();
  CmakeBuild::new(
    LibrarySpec::shared(ctx, "freetype"),
    [
      "-DBUILD_SHARED_LIBS=OFF".to_string(),
      "-DFT_REQUIRE_ZLIB=TRUE".to_string(),
      "-DFT_REQUIRE_PNG=TRUE".to_string(),
      "-DFT_DISABLE_BZIP2=TRUE".to_string(),
      "-DFT_DISABLE_BROTLI=TRUE".to_string(),
      "-DFT_DISABLE_HARFBUZZ=TRUE".to_string(),
      format!("-DZLIB_ROOT={}", install.display()),
      format!("-DCMAKE_PREFIX_PATH={}", install.display()),
    ],
  )
  .run(ctx)
}

fn build_harfbuzz(ctx: &RunContext) -> Result<()> {
  let pkgconfig = ctx.install_dir().join("lib").join("pkgconfig");
  MesonBuild::new(
    LibrarySpec::shared(ctx, "harfbuzz"),
    [
      "-Ddefault_library=static",
      "-Dfreetype=enabled",
      "-Dglib=disabled",
      "-Dgobject=disabled",
      "-Dcairo=disabled",
      "-Dicu=disabled",
      "-Dtests=disabled",
      "-Ddocs=disabled",
      "-Dbenchmark=disabled",
    ],
  )
  .env("PKG_CONFIG_PATH", pkgconfig.to_string_lossy())
  .run(ctx)
}

fn build_sdl(ctx: &RunContext) -> Result<()> {
  CmakeBuild::new(
    LibrarySpec::shared(ctx, "sdl"),
    [
      "-DSDL_SHARED=OFF",
      "-DSDL_STATIC=ON",
      "-DSDL_TEST_LIBRARY=OFF",
      "-DSDL_EXAMPLES=OFF",
    ],
  )
  .run(ctx)
}

fn build_native(ctx: &RunContext) -> Result<()> {
  let install = ctx.install_dir();
  CmakeBuild::new(
    LibrarySpec::glue(ctx),
    [
      "-DBUILD_SHARED_LIBS=OFF".to_string(),
      "-DCMAKE_POSITION_INDEPENDENT_CODE=ON".to_string(),
      format!("-DCMAKE_PREFIX_PATH={}", install.display()),
    ],
  )
  .run(ctx)
}

fn build_runtime(ctx: &RunContext) -> Result<()> {
  cargo_build(ctx, &ctx.runtime_dir())
}

fn build_sample(ctx: &RunContext) -> Result<()> {
  cargo_build(ctx, &ctx.sample_dir())
}

/// Drive the language-runtime package manager, pointing its build scripts
/// at the staged native artifacts.
fn cargo_build(ctx: &RunContext, dir: &Path) -> Result<()> {
  let resolver = ToolResolver::from_context(ctx);
  let cargo = resolver.resolve("cargo")?;

  let mut invocation = ProcessInvocation::new(&cargo, dir)
    .arg("build")
    .env(ENV_NATIVE_DIR, ctx.native_artifact_dir().to_string_lossy())
    .env(ENV_DEP_PREFIX, ctx.install_dir().to_string_lossy());
  if ctx.is_release() {
    invocation = invocation.arg("--release");
  }
  invocation.run(&ctx.platform)
}

fn clean(ctx: &RunContext) -> Result<()> {
  for dir in [ctx.build_root(), ctx.install_dir(), ctx.artifact_dir()] {
    match std::fs::remove_dir_all(&dir) {
      Ok(()) => info!(path = %dir.display(), "removed"),
      Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
      Err(err) => return Err(err.into()),
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::context::BuildConfig;
  use tempfile::TempDir;

  #[test]
  fn registry_declares_the_full_surface() {
    let ctx = RunContext::new("/work/staccato", BuildConfig::Debug);
    let graph = registry(&ctx);

    for name in [
      "restore-submodules",
      "restore-native",
      "build-zlib",
      "build-libpng",
      "build-freetype",
      "build-harfbuzz",
      "build-sdl",
      "build-native",
      "build-runtime",
      "build-sample",
      "build-all",
      "clean",
    ] {
      assert!(graph.contains(name), "missing target '{}'", name);
    }
  }

  #[test]
  fn clean_removes_configuration_trees() {
    let temp = TempDir::new().unwrap();
    let ctx = RunContext::new(temp.path(), BuildConfig::Debug);

    std::fs::create_dir_all(ctx.build_dir("zlib")).unwrap();
    std::fs::create_dir_all(ctx.install_dir()).unwrap();
    std::fs::write(ctx.install_dir().join("zlib-installed.lock"), b"").unwrap();
    std::fs::create_dir_all(ctx.native_artifact_dir()).unwrap();

    // An inactive configuration's trees stay.
    let release = RunContext::new(temp.path(), BuildConfig::Release);
    std::fs::create_dir_all(release.install_dir()).unwrap();

    registry(&ctx).execute("clean").unwrap();

    assert!(!ctx.build_root().exists());
    assert!(!ctx.install_dir().exists());
    assert!(!ctx.artifact_dir().exists());
    assert!(release.install_dir().exists());
  }

  #[test]
  fn clean_tolerates_missing_trees() {
    let temp = TempDir::new().unwrap();
    let ctx = RunContext::new(temp.path(), BuildConfig::Debug);

    registry(&ctx).execute("clean").unwrap();
  }

  #[test]
  fn verify_sources_names_the_missing_checkout() {
    let temp = TempDir::new().unwrap();
    let ctx = RunContext::new(temp.path(), BuildConfig::Debug);

    let err = verify_sources(&ctx).unwrap_err();
    assert!(matches!(err, BuildError::MissingSource { ref id, .. } if id == GLUE_ID));

    std::fs::create_dir_all(ctx.native_dir()).unwrap();
    let err = verify_sources(&ctx).unwrap_err();
    assert!(matches!(err, BuildError::MissingSource { ref id, .. } if id == "zlib"));

    for id in DEP_IDS {
      std::fs::create_dir_all(ctx.dep_source_dir(id)).unwrap();
    }
    verify_sources(&ctx).unwrap();
  }

  #[test]
  fn update_version_files_patches_runtime_manifest() {
    let temp = TempDir::new().unwrap();
    let ctx = RunContext::new(temp.path(), BuildConfig::Debug);

    std::fs::create_dir_all(ctx.runtime_dir()).unwrap();
    std::fs::write(
      ctx.runtime_manifest(),
      "[package]\nname = \"staccato-runtime\"\n# stbuild:version:start\nversion = \"0.0.0\"\n# stbuild:version:end\n",
    )
    .unwrap();

    update_version_files(&ctx, "4.2.0").unwrap();

    let manifest = std::fs::read_to_string(ctx.runtime_manifest()).unwrap();
    assert!(manifest.contains("version = \"4.2.0\""));
  }
}
