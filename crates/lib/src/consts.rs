/// Project configuration file name.
pub const CONFIG_FILENAME: &str = "funcpack.toml";

/// Modules root, relative to the source directory.
pub const MODULES_DIR: &str = "src/modules";

/// Length of the truncated hash used for plan ids.
pub const OBJ_HASH_PREFIX_LEN: usize = 20;

/// Deployment plan file name, written next to the archive.
pub const PLAN_FILENAME: &str = "plan.json";

/// Default identifier length ceiling for deployable resource names.
pub const DEFAULT_NAME_CEILING: usize = 64;

/// Default length of the random suffix the provisioning engine appends.
pub const DEFAULT_RESERVED_SUFFIX: usize = 8;

/// Default export name used in handler identifiers.
pub const DEFAULT_HANDLER_EXPORT: &str = "default";

/// `SOURCE_DATE_EPOCH` handed to build commands.
/// Value is 315532800 = January 1, 1980 00:00:00 UTC (ZIP epoch), matching archive timestamps.
pub const SOURCE_DATE_EPOCH: &str = "315532800";
