//! Platform and architecture detection

use serde::Serialize;
use std::env;
use std::fmt;

/// Extension list used on the Windows family when `PATHEXT` is unset.
const DEFAULT_PATHEXT: &str = ".COM;.EXE;.BAT;.CMD";

/// Operating system family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    Linux,
    Darwin,
    Windows,
}

impl Os {
    /// Detect the current operating system at compile time
    #[cfg(target_os = "linux")]
    pub const fn current() -> Self {
        Os::Linux
    }

    #[cfg(target_os = "macos")]
    pub const fn current() -> Self {
        Os::Darwin
    }

    #[cfg(target_os = "windows")]
    pub const fn current() -> Self {
        Os::Windows
    }

    /// Returns the OS name as used in platform strings
    pub const fn as_str(&self) -> &'static str {
        match self {
            Os::Linux => "linux",
            Os::Darwin => "darwin",
            Os::Windows => "windows",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// CPU architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    X86_64,
    Aarch64,
}

impl Arch {
    /// Detect the current architecture at compile time
    #[cfg(target_arch = "x86_64")]
    pub const fn current() -> Self {
        Arch::X86_64
    }

    #[cfg(target_arch = "aarch64")]
    pub const fn current() -> Self {
        Arch::Aarch64
    }

    /// Returns the architecture name as used in platform strings
    pub const fn as_str(&self) -> &'static str {
        match self {
            Arch::X86_64 => "x86_64",
            Arch::Aarch64 => "aarch64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Combined platform capabilities injected into the tool resolver and the
/// build step adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

impl Platform {
    /// Create a new platform value
    pub const fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Detect the current platform at compile time
    pub const fn current() -> Self {
        Self {
            os: Os::current(),
            arch: Arch::current(),
        }
    }

    /// Extension appended to a program name that carries none when the
    /// platform requires one ("" on Unix-family systems).
    pub const fn exe_extension(&self) -> &'static str {
        match self.os {
            Os::Windows => ".exe",
            Os::Linux | Os::Darwin => "",
        }
    }

    /// Executable suffixes tried during search-path discovery.
    ///
    /// On the Windows family this is the registered extension list from
    /// `PATHEXT` (falling back to a fixed default when unset); elsewhere only
    /// the empty suffix is tried.
    pub fn executable_suffixes(&self) -> Vec<String> {
        match self.os {
            Os::Windows => {
                let raw = env::var("PATHEXT").unwrap_or_else(|_| DEFAULT_PATHEXT.to_string());
                parse_pathext(&raw)
            }
            Os::Linux | Os::Darwin => vec![String::new()],
        }
    }

    /// File name of a static library for the given base name
    /// (`libfoo.a` on Unix-family systems, `foo.lib` on Windows).
    pub fn static_lib_filename(&self, base: &str) -> String {
        match self.os {
            Os::Windows => format!("{}.lib", base),
            Os::Linux | Os::Darwin => format!("lib{}.a", base),
        }
    }

    /// Separator between entries of a search-path variable
    pub const fn path_list_separator(&self) -> char {
        match self.os {
            Os::Windows => ';',
            Os::Linux | Os::Darwin => ':',
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.arch, self.os)
    }
}

/// Parse a `PATHEXT`-style extension list into individual suffixes.
///
/// Empty entries are dropped; entries are returned as registered (callers
/// decide whether to also try lower-cased variants).
pub fn parse_pathext(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|ext| !ext.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_string_format() {
        let platform = Platform::new(Os::Darwin, Arch::Aarch64);
        assert_eq!(platform.to_string(), "aarch64-darwin");

        let platform = Platform::new(Os::Linux, Arch::X86_64);
        assert_eq!(platform.to_string(), "x86_64-linux");
    }

    #[test]
    fn exe_extension_per_os() {
        assert_eq!(Platform::new(Os::Windows, Arch::X86_64).exe_extension(), ".exe");
        assert_eq!(Platform::new(Os::Linux, Arch::X86_64).exe_extension(), "");
        assert_eq!(Platform::new(Os::Darwin, Arch::Aarch64).exe_extension(), "");
    }

    #[test]
    fn unix_suffixes_are_empty_only() {
        let suffixes = Platform::new(Os::Linux, Arch::X86_64).executable_suffixes();
        assert_eq!(suffixes, vec![String::new()]);
    }

    #[test]
    fn parse_pathext_splits_and_drops_empty() {
        let suffixes = parse_pathext(".COM;.EXE;;.BAT");
        assert_eq!(suffixes, vec![".COM", ".EXE", ".BAT"]);
    }

    #[test]
    fn static_lib_naming() {
        assert_eq!(
            Platform::new(Os::Linux, Arch::X86_64).static_lib_filename("freetype"),
            "libfreetype.a"
        );
        assert_eq!(
            Platform::new(Os::Windows, Arch::X86_64).static_lib_filename("freetype"),
            "freetype.lib"
        );
    }

    #[test]
    fn path_list_separator_per_os() {
        assert_eq!(Platform::new(Os::Windows, Arch::X86_64).path_list_separator(), ';');
        assert_eq!(Platform::new(Os::Linux, Arch::X86_64).path_list_separator(), ':');
    }

    #[test]
    fn current_platform_detects() {
        let platform = Platform::current();
        assert!(platform.to_string().contains('-'));
    }
}
