//! Merge rules: defaults first, later sources override earlier ones.

use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Prefix for environment overrides, e.g. `STOREFRONT_SYNC__SEARCH__DEBOUNCE_MS`.
pub const ENV_PREFIX: &str = "STOREFRONT_SYNC";

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("api.base_url", "http://localhost:8080")?
        .set_default("api.connect_timeout_ms", 10_000_i64)?
        .set_default("api.request_timeout_ms", 30_000_i64)?
        .set_default("search.debounce_ms", 1_000_i64)?
        .set_default("search.response_timeout_ms", 10_000_i64)
}

/// Environment source layered last so it wins over every file.
pub fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}
