//! Handlebars template rendering with a compiled-template cache.
//!
//! This module provides:
//! - Cache key derivation from a template key and the configured namespace
//! - Compilation of `{{variable}}` templates through handlebars
//! - A compiled-template cache over a pluggable key-value store
//! - A render pipeline that falls back to the raw template text when a
//!   template cannot be compiled or executed
//!
//! # Example
//!
//! ```ignore
//! let store = create_cache_store();
//! let engine = TemplateEngine::from_settings(store, &settings);
//!
//! // Eager template text
//! let rendered = engine.render(
//!     "order-shipped",
//!     json!({"order_id": "ORD-123", "carrier": "FedEx"}),
//!     "Order {{order_id}} is on its way via {{carrier}}",
//! );
//!
//! // Template text fetched only on a cache miss
//! let rendered = engine
//!     .render_async("order-shipped", variables, || load_template("order-shipped"))
//!     .await?;
//! ```

mod cache;
mod compiler;
mod engine;
mod key;
mod store;
mod types;
mod variables;

pub use cache::CompiledTemplateCache;
pub use compiler::TemplateCompiler;
pub use engine::TemplateEngine;
pub use key::CacheKey;
pub use store::{create_cache_store, CacheStore, CacheStoreError, MemoryCacheStore};
pub use types::{CompileError, CompiledTemplate, ExecError, RenderError, RenderResult};
pub use variables::Variables;
