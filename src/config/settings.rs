use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Compiled-template cache settings
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Whether compiled templates are cached at all
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    /// Lifetime of every cache entry in hours
    #[serde(default = "default_lifetime_in_hours")]
    pub lifetime_in_hours: u64,
    /// Namespace appended to every template key
    #[serde(default = "default_cache_name")]
    pub name: String,
    /// Interval of the expired-entry sweep for the in-memory store
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,
}

fn default_cache_enabled() -> bool {
    true
}

fn default_lifetime_in_hours() -> u64 {
    24
}

fn default_cache_name() -> String {
    "CompiledTemplate".to_string()
}

fn default_cleanup_interval() -> u64 {
    300 // 5 minutes
}

/// Upper bound for `cache.lifetime_in_hours` (ten years)
pub const MAX_LIFETIME_IN_HOURS: u64 = 87_600;

impl CacheConfig {
    /// Entry lifetime; saturates instead of overflowing on unvalidated input
    pub fn lifetime(&self) -> Duration {
        Duration::from_secs(self.lifetime_in_hours.saturating_mul(3600))
    }
}

/// Expression engine behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Fail execution when a referenced variable is missing
    #[serde(default)]
    pub strict_mode: bool,
    /// HTML-escape `{{value}}` output (`{{{value}}}` is never escaped)
    #[serde(default = "default_escape_html")]
    pub escape_html: bool,
}

fn default_escape_html() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by RUST_LOG
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            // Start with default values
            .set_default("cache.enabled", true)?
            .set_default("cache.lifetime_in_hours", 24)?
            .set_default("cache.name", "CompiledTemplate")?
            .set_default("cache.cleanup_interval_seconds", 300)?
            .set_default("engine.strict_mode", false)?
            .set_default("engine.escape_html", true)?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables
            // ARA_TEMPLATE__CACHE__LIFETIME_IN_HOURS, ARA_TEMPLATE__CACHE__NAME, etc.
            .add_source(
                Environment::with_prefix("ARA_TEMPLATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the render pipeline cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.lifetime_in_hours == 0 {
            return Err(ConfigError::Message(
                "cache.lifetime_in_hours must be a positive integer".to_string(),
            ));
        }

        if self.cache.lifetime_in_hours > MAX_LIFETIME_IN_HOURS {
            return Err(ConfigError::Message(format!(
                "cache.lifetime_in_hours must not exceed {}",
                MAX_LIFETIME_IN_HOURS
            )));
        }

        if self.cache.name.trim().is_empty() {
            return Err(ConfigError::Message(
                "cache.name must not be empty".to_string(),
            ));
        }

        if self.cache.cleanup_interval_seconds == 0 {
            return Err(ConfigError::Message(
                "cache.cleanup_interval_seconds must be a positive integer".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            lifetime_in_hours: default_lifetime_in_hours(),
            name: default_cache_name(),
            cleanup_interval_seconds: default_cleanup_interval(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strict_mode: false,
            escape_html: default_escape_html(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
