//! Platform capabilities for the Staccato native build
//!
//! This crate provides the single platform value injected into the build
//! orchestration:
//! - OS family and architecture detection
//! - Executable suffix rules for tool discovery and process invocation
//! - Static library naming conventions

mod platform;

pub use platform::{Arch, Os, Platform, parse_pathext};
