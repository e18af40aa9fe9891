//! Compiler toolchain derivation for the Meson adapter.
//!
//! Meson picks its compilers from the environment, while the CMake builds
//! take theirs from the shared toolchain file. To keep both halves of the
//! dependency tree on one compiler, the Meson adapter resolves a single
//! canonical compiler and derives the sibling tools (C++ front-end,
//! archiver, index tool) by substituting known name fragments within the
//! same directory, then injects all four as environment overrides.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::tools::ToolResolver;

/// Sibling name substitutions per compiler family. The fragment is replaced
/// once, so versioned names keep their suffix (`clang-18` → `llvm-ar-18`).
/// Ordered most specific first; `gcc` must precede `cc`.
const FAMILIES: &[(&str, &str, &str, &str)] = &[
  ("clang", "clang++", "llvm-ar", "llvm-ranlib"),
  ("gcc", "g++", "gcc-ar", "gcc-ranlib"),
  ("cc", "c++", "ar", "ranlib"),
];

/// Resolved compiler plus derived sibling tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
  pub cc: PathBuf,
  pub cxx: PathBuf,
  pub ar: PathBuf,
  pub ranlib: PathBuf,
}

impl Toolchain {
  /// Resolve the canonical compiler (override, else clang, else gcc) and
  /// derive the siblings.
  pub fn resolve(resolver: &ToolResolver<'_>, cc_override: Option<&Path>) -> Result<Self> {
    let cc = match cc_override {
      Some(path) => resolver.resolve(&path.to_string_lossy())?,
      None => resolver.resolve("clang").or_else(|_| resolver.resolve("gcc"))?,
    };
    Ok(Self::derive(&cc))
  }

  /// Derive sibling tool paths from one resolved compiler.
  pub fn derive(cc: &Path) -> Self {
    let dir = cc.parent().unwrap_or_else(|| Path::new(""));
    let file = cc.file_name().map(|f| f.to_string_lossy()).unwrap_or_default();

    for (fragment, cxx, ar, ranlib) in FAMILIES {
      if file.contains(fragment) {
        return Self {
          cc: cc.to_path_buf(),
          cxx: dir.join(file.replacen(fragment, cxx, 1)),
          ar: dir.join(file.replacen(fragment, ar, 1)),
          ranlib: dir.join(file.replacen(fragment, ranlib, 1)),
        };
      }
    }

    // Unrecognized compiler name: fall back to the generic sibling names
    // next to it.
    Self {
      cc: cc.to_path_buf(),
      cxx: dir.join("c++"),
      ar: dir.join("ar"),
      ranlib: dir.join("ranlib"),
    }
  }

  /// Environment overrides injected into the package-manager invocation.
  pub fn env(&self) -> BTreeMap<String, String> {
    [
      ("CC", &self.cc),
      ("CXX", &self.cxx),
      ("AR", &self.ar),
      ("RANLIB", &self.ranlib),
    ]
    .into_iter()
    .map(|(key, path)| (key.to_string(), path.to_string_lossy().into_owned()))
    .collect()
  }
}
