//! Blocking external process invocation.
//!
//! Arguments are passed as a literal vector, never through a shell, so
//! values containing spaces or special characters are not reinterpreted.
//! Standard streams are inherited: the operator sees child output in real
//! time and nothing is captured. The call blocks until the child exits;
//! there is no timeout, a hung child hangs the run.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use stbuild_platform::Platform;
use tracing::{debug, info};

use crate::error::{BuildError, Result};

/// One external program invocation.
#[derive(Debug, Clone)]
pub struct ProcessInvocation {
  program: PathBuf,
  args: Vec<String>,
  cwd: PathBuf,
  env: BTreeMap<String, String>,
}

impl ProcessInvocation {
  pub fn new(program: impl Into<PathBuf>, cwd: impl Into<PathBuf>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: cwd.into(),
      env: BTreeMap::new(),
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn arg_path(self, path: &Path) -> Self {
    self.arg(path.to_string_lossy())
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  /// Environment override, merged over the inherited environment.
  pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.env.insert(key.into(), value.into());
    self
  }

  pub fn envs<I>(mut self, vars: I) -> Self
  where
    I: IntoIterator<Item = (String, String)>,
  {
    self.env.extend(vars);
    self
  }

  /// Rendered command for logs and failure diagnostics.
  pub fn command_line(&self) -> String {
    let mut line = self.program.to_string_lossy().into_owned();
    for arg in &self.args {
      line.push(' ');
      line.push_str(arg);
    }
    line
  }

  /// Run the program and wait for it to exit.
  ///
  /// A nonzero exit converts to `ProcessFailed` carrying the rendered
  /// command and the exit code (`None` when the child died to a signal).
  pub fn run(&self, platform: &Platform) -> Result<()> {
    let program = with_exe_extension(&self.program, platform);

    info!(command = %self.command_line(), cwd = %self.cwd.display(), "running");
    if !self.env.is_empty() {
      debug!(env = ?self.env.keys().collect::<Vec<_>>(), "environment overrides");
    }

    let status = Command::new(&program)
      .args(&self.args)
      .current_dir(&self.cwd)
      .envs(&self.env)
      .status()?;

    if !status.success() {
      return Err(BuildError::ProcessFailed {
        command: self.command_line(),
        code: status.code(),
      });
    }

    Ok(())
  }
}

/// Append the platform executable extension when the program name carries
/// no extension and the platform requires one.
fn with_exe_extension(program: &Path, platform: &Platform) -> PathBuf {
  let ext = platform.exe_extension();
  if ext.is_empty() || program.extension().is_some() {
    return program.to_path_buf();
  }
  let mut name = program.as_os_str().to_os_string();
  name.push(ext);
  PathBuf::from(name)
}

#[cfg(test)]
mod tests {
  use super::*;
  use stbuild_platform::{Arch, Os};
  use tempfile::TempDir;

  #[cfg(unix)]
  fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
  }

  #[test]
  fn extension_appended_only_on_windows() {
    let windows = Platform::new(Os::Windows, Arch::X86_64);
    let linux = Platform::new(Os::Linux, Arch::X86_64);

    assert_eq!(with_exe_extension(Path::new("cmake"), &windows), Path::new("cmake.exe"));
    assert_eq!(
      with_exe_extension(Path::new("cmake.bat"), &windows),
      Path::new("cmake.bat")
    );
    assert_eq!(with_exe_extension(Path::new("cmake"), &linux), Path::new("cmake"));
  }

  #[test]
  fn command_line_rendering() {
    let inv = ProcessInvocation::new("cmake", "/tmp")
      .arg("--build")
      .arg("build-debug/zlib");
    assert_eq!(inv.command_line(), "cmake --build build-debug/zlib");
  }

  #[test]
  #[cfg(unix)]
  fn nonzero_exit_surfaces_code() {
    let temp = TempDir::new().unwrap();
    let script = write_script(temp.path(), "fail-tool", "exit 2");

    let err = ProcessInvocation::new(&script, temp.path())
      .run(&Platform::current())
      .unwrap_err();

    match err {
      BuildError::ProcessFailed { command, code } => {
        assert_eq!(code, Some(2));
        assert!(command.contains("fail-tool"));
      }
      other => panic!("expected ProcessFailed, got {other:?}"),
    }
  }

  #[test]
  #[cfg(unix)]
  fn zero_exit_succeeds() {
    let temp = TempDir::new().unwrap();
    let script = write_script(temp.path(), "ok-tool", "exit 0");

    ProcessInvocation::new(&script, temp.path())
      .run(&Platform::current())
      .unwrap();
  }

  #[test]
  #[cfg(unix)]
  fn env_overrides_reach_the_child() {
    let temp = TempDir::new().unwrap();
    let script = write_script(temp.path(), "env-tool", r#"printf '%s' "$STB_PROBE" > probe.txt"#);

    ProcessInvocation::new(&script, temp.path())
      .env("STB_PROBE", "overridden")
      .run(&Platform::current())
      .unwrap();

    let probe = std::fs::read_to_string(temp.path().join("probe.txt")).unwrap();
    assert_eq!(probe, "overridden");
  }

  #[test]
  #[cfg(unix)]
  fn child_runs_in_requested_cwd() {
    let temp = TempDir::new().unwrap();
    let script = write_script(temp.path(), "cwd-tool", "touch cwd_marker");
    let work = temp.path().join("work");
    std::fs::create_dir(&work).unwrap();

    ProcessInvocation::new(&script, &work).run(&Platform::current()).unwrap();

    assert!(work.join("cwd_marker").exists());
  }
}
