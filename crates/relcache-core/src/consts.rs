pub const DOT_RELCACHE_CACHE_DIR: &str = "./relcache/cache";
pub const DOT_RELCACHE_SETTINGS_CONFIG: &str = "./relcache/Settings.toml";
pub const DOT_RELCACHE_LOGS_DIR: &str = "./relcache/logs";

/// Suffix of the temporary files an asset is written to before it's moved into place.
pub const PARTIAL_SUFFIX: &str = ".part";

/// Capacity of the notification channel between the fetch task and its stream.
pub const NOTIFICATION_BUFFER: usize = 32;

pub const RELCACHE_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const RELCACHE_NAME: &str = "relcache";
