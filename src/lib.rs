// Shared infrastructure
pub mod config;
pub mod error;
pub mod metrics;
pub mod telemetry;

// Rendering
pub mod template;

// Supporting modules
pub mod tasks;
