//! Prometheus metrics for the template engine.
//!
//! - Cache metrics (hits, misses, writes, store errors)
//! - Compilation and execution failures
//! - Raw-text fallbacks and render latency

mod helpers;

pub use helpers::{encode_metrics, CacheMetrics, RenderMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge,
    Histogram, IntCounter, IntCounterVec, IntGauge,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "ara_template";

lazy_static! {
    // ============================================================================
    // Cache Metrics
    // ============================================================================

    /// Compiled templates served from the cache
    pub static ref CACHE_HITS_TOTAL: IntCounter = register_int_counter!(
        format!("{}_cache_hits_total", METRIC_PREFIX),
        "Total renders served by a cached compiled template"
    ).unwrap();

    /// Renders that had to compile the template
    pub static ref CACHE_MISSES_TOTAL: IntCounter = register_int_counter!(
        format!("{}_cache_misses_total", METRIC_PREFIX),
        "Total renders that missed the compiled-template cache"
    ).unwrap();

    /// Compiled templates written to the cache
    pub static ref CACHE_SETS_TOTAL: IntCounter = register_int_counter!(
        format!("{}_cache_sets_total", METRIC_PREFIX),
        "Total compiled templates written to the cache"
    ).unwrap();

    /// Cache store failures by operation
    pub static ref CACHE_STORE_ERRORS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_cache_store_errors_total", METRIC_PREFIX),
        "Total cache store errors by operation",
        &["operation"]
    ).unwrap();

    /// Expired entries removed by the cleanup task
    pub static ref CACHE_PURGED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_cache_purged_total", METRIC_PREFIX),
        "Total expired compiled templates purged from the memory store"
    ).unwrap();

    /// Entries currently held by the memory store
    pub static ref CACHE_ENTRIES: IntGauge = register_int_gauge!(
        format!("{}_cache_entries", METRIC_PREFIX),
        "Compiled templates currently held by the memory store"
    ).unwrap();

    // ============================================================================
    // Render Metrics
    // ============================================================================

    /// Compilation failures by kind
    pub static ref COMPILE_FAILURES_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_compile_failures_total", METRIC_PREFIX),
        "Total template compilation failures by kind",
        &["kind"]
    ).unwrap();

    /// Execution failures
    pub static ref EXEC_FAILURES_TOTAL: IntCounter = register_int_counter!(
        format!("{}_exec_failures_total", METRIC_PREFIX),
        "Total template execution failures"
    ).unwrap();

    /// Renders that returned the raw template text
    pub static ref FALLBACKS_TOTAL: IntCounter = register_int_counter!(
        format!("{}_fallbacks_total", METRIC_PREFIX),
        "Total renders that fell back to the raw template text"
    ).unwrap();

    /// Template sources that could not be resolved
    pub static ref SOURCE_FAILURES_TOTAL: IntCounter = register_int_counter!(
        format!("{}_source_failures_total", METRIC_PREFIX),
        "Total template sources that could not be resolved"
    ).unwrap();

    /// Render latency
    pub static ref RENDER_LATENCY: Histogram = register_histogram!(
        format!("{}_render_latency_seconds", METRIC_PREFIX),
        "Template render latency in seconds",
        vec![0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1]
    ).unwrap();
}
