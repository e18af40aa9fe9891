//! Build step adapters.
//!
//! Both adapters share the shape "configure → build → install → mark
//! cached" and launch no subprocess at all when the cache guard reports the
//! library as already installed.

pub mod cmake;
pub mod meson;
pub mod stage;

pub use cmake::CmakeBuild;
pub use meson::MesonBuild;
pub use stage::stage_artifact;
