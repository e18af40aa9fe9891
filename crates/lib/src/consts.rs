//! Shared constants.

/// Suffix of the per-library sentinel file, appended to the library id.
pub const SENTINEL_SUFFIX: &str = "-installed.lock";

/// Library id of the glue native library.
pub const GLUE_ID: &str = "staccato-native";

/// Marker lines delimiting the patched region of the runtime manifest.
pub const VERSION_START_MARKER: &str = "# stbuild:version:start";
pub const VERSION_END_MARKER: &str = "# stbuild:version:end";

/// Environment variable pointing the runtime build at the glue install root.
pub const ENV_NATIVE_DIR: &str = "STACCATO_NATIVE_DIR";

/// Environment variable pointing the runtime build at the shared dependency prefix.
pub const ENV_DEP_PREFIX: &str = "STACCATO_DEP_PREFIX";
