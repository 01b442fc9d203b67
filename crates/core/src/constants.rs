//! Shared constants for satellite-inventory.

/// Environment variable pointing at an explicit settings file
pub const CONFIG_ENV_VAR: &str = "SATINV_CONFIG";

/// Settings file name looked up in the working directory and XDG config dir
pub const CONFIG_FILENAME: &str = "satinv.toml";

/// Reserved inventory key carrying per-host variables
pub const META_KEY: &str = "_meta";

/// Group that collects hosts without any hostgroup assignment
pub const UNGROUPED_GROUP: &str = "ungrouped";

/// Page size used when paginating the hosts endpoint
pub const DEFAULT_PER_PAGE: u32 = 100;

/// Maximum number of fetch attempts for transient API failures
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Base delay for exponential backoff between fetch attempts (milliseconds)
pub const DEFAULT_BASE_DELAY_MS: u64 = 250;
