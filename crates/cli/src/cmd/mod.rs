mod build;
mod info;
mod update;

pub use build::cmd_build;
pub use info::cmd_info;
pub use update::cmd_update;
