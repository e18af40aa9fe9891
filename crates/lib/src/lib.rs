//! stbuild-lib: orchestration core for the Staccato native build
//!
//! This crate provides the machinery that drives the multi-stage build of the
//! runtime's native dependency tree:
//! - `graph`: named build targets with dependency-ordered, exactly-once execution
//! - `tools`: executable discovery along the search path and compiler toolchain derivation
//! - `process`: blocking external process invocation with literal argument vectors
//! - `cache`: sentinel files that make per-library build steps idempotent
//! - `steps`: CMake and Meson build-step adapters plus artifact staging
//! - `targets`: the declarative target registry wiring every library build
//! - `version`: marker-delimited version patching of the runtime manifest

pub mod cache;
pub mod consts;
pub mod context;
pub mod error;
pub mod graph;
pub mod libs;
pub mod process;
pub mod steps;
pub mod targets;
pub mod tools;
pub mod version;
