//! Metrics helper structs for convenient metric recording

use std::time::Duration;

use prometheus::{Encoder, TextEncoder};

use super::{
    CACHE_ENTRIES, CACHE_HITS_TOTAL, CACHE_MISSES_TOTAL, CACHE_PURGED_TOTAL, CACHE_SETS_TOTAL,
    CACHE_STORE_ERRORS_TOTAL, COMPILE_FAILURES_TOTAL, EXEC_FAILURES_TOTAL, FALLBACKS_TOTAL,
    RENDER_LATENCY, SOURCE_FAILURES_TOTAL,
};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording cache metrics
pub struct CacheMetrics;

impl CacheMetrics {
    pub fn record_hit() {
        CACHE_HITS_TOTAL.inc();
    }

    pub fn record_miss() {
        CACHE_MISSES_TOTAL.inc();
    }

    pub fn record_set() {
        CACHE_SETS_TOTAL.inc();
    }

    /// Record a failed store read
    pub fn record_read_error() {
        CACHE_STORE_ERRORS_TOTAL.with_label_values(&["read"]).inc();
    }

    /// Record a failed store write
    pub fn record_write_error() {
        CACHE_STORE_ERRORS_TOTAL.with_label_values(&["write"]).inc();
    }

    /// Record a sweep of the memory store
    pub fn record_purge(purged: usize, remaining: usize) {
        CACHE_PURGED_TOTAL.inc_by(purged as u64);
        CACHE_ENTRIES.set(remaining as i64);
    }
}

/// Helper struct for recording render metrics
pub struct RenderMetrics;

impl RenderMetrics {
    pub fn record_compile_failure(kind: &str) {
        COMPILE_FAILURES_TOTAL.with_label_values(&[kind]).inc();
    }

    pub fn record_exec_failure() {
        EXEC_FAILURES_TOTAL.inc();
    }

    pub fn record_fallback() {
        FALLBACKS_TOTAL.inc();
    }

    pub fn record_source_failure() {
        SOURCE_FAILURES_TOTAL.inc();
    }

    pub fn record_latency(elapsed: Duration) {
        RENDER_LATENCY.observe(elapsed.as_secs_f64());
    }
}
