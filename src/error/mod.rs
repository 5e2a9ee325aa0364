use thiserror::Error;

use crate::telemetry::TelemetryError;
use crate::template::RenderError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),

    #[error("Invalid variables: {0}")]
    Variables(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Usage: {0}")]
    Usage(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
