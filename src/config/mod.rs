mod settings;

pub use settings::{CacheConfig, EngineConfig, LoggingConfig, Settings, MAX_LIFETIME_IN_HOURS};
