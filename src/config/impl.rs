use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Returns an Arc pointer to the configuration, which is cheap to clone
/// and doesn't hold any locks. Falls back to defaults when
/// `init_config_from` has not been called.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get_or_init(|| ArcSwap::from_pointee(StaticConfig::default()))
        .load_full()
}

/// Initialize the global configuration from a config file path
///
/// If the file doesn't exist, uses in-memory defaults. Only the first
/// initialization takes effect.
///
/// # Examples
/// ```no_run
/// use geoip_enricher::config::{DEFAULT_CONFIG_PATH, init_config_from};
/// init_config_from(DEFAULT_CONFIG_PATH);
/// ```
pub fn init_config_from(path: &str) {
    CONFIG.get_or_init(|| ArcSwap::from_pointee(StaticConfig::load_or_default(path)));
}
