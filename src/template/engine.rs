//! Render pipeline: cache lookup, compile on miss, execute, fall back to raw text.

use std::error::Error;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use crate::config::{CacheConfig, EngineConfig, Settings};
use crate::metrics::RenderMetrics;

use super::cache::CompiledTemplateCache;
use super::compiler::TemplateCompiler;
use super::key::CacheKey;
use super::store::CacheStore;
use super::types::{CompileError, CompiledTemplate, RenderError, RenderResult};
use super::variables::Variables;

/// Renders templates through the compiled-template cache.
///
/// Concurrent renders of the same key are not deduplicated: both may miss,
/// both compile and both write, and the last write wins.
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    cache: CompiledTemplateCache,
    compiler: TemplateCompiler,
}

impl TemplateEngine {
    pub fn new(
        store: Arc<dyn CacheStore>,
        cache_config: &CacheConfig,
        engine_config: &EngineConfig,
    ) -> Self {
        Self {
            cache: CompiledTemplateCache::new(store, cache_config),
            compiler: TemplateCompiler::new(engine_config.clone()),
        }
    }

    pub fn from_settings(store: Arc<dyn CacheStore>, settings: &Settings) -> Self {
        Self::new(store, &settings.cache, &settings.engine)
    }

    /// Render `template` under `template_key`.
    ///
    /// On a cache hit `template` is not used. When the template cannot be
    /// compiled or executed, the raw template text is returned unchanged.
    pub fn render<V>(&self, template_key: &str, variables: V, template: &str) -> String
    where
        V: Into<Variables>,
    {
        let start = Instant::now();
        let variables = variables.into();
        let cache_key = self.cache.key_for(template_key);

        let rendered = match self.lookup(&cache_key) {
            Some(compiled) => self.execute_or_fallback(template_key, &compiled, &variables),
            None => self.compile_and_execute(template_key, &cache_key, template, &variables),
        };

        RenderMetrics::record_latency(start.elapsed());
        rendered
    }

    /// Render a template whose text is fetched lazily.
    ///
    /// `supplier` runs at most once and only on a cache miss. Its failure is
    /// returned as [`RenderError::SourceUnavailable`]; compile and execution
    /// failures still fall back to the raw text.
    pub async fn render_async<V, F, Fut, E>(
        &self,
        template_key: &str,
        variables: V,
        supplier: F,
    ) -> RenderResult<String>
    where
        V: Into<Variables>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        let start = Instant::now();
        let variables = variables.into();
        let cache_key = self.cache.key_for(template_key);

        if let Some(compiled) = self.lookup(&cache_key) {
            let rendered = self.execute_or_fallback(template_key, &compiled, &variables);
            RenderMetrics::record_latency(start.elapsed());
            return Ok(rendered);
        }

        let source = match supplier().await {
            Ok(source) => source,
            Err(e) => {
                let source: Box<dyn Error + Send + Sync> = e.into();
                RenderMetrics::record_source_failure();
                tracing::error!(
                    template_key = %template_key,
                    error = %source,
                    "Failed to resolve template source"
                );
                return Err(RenderError::SourceUnavailable {
                    template_key: template_key.to_string(),
                    source,
                });
            }
        };

        let rendered = self.compile_and_execute(template_key, &cache_key, &source, &variables);
        RenderMetrics::record_latency(start.elapsed());
        Ok(rendered)
    }

    fn lookup(&self, cache_key: &CacheKey) -> Option<CompiledTemplate> {
        if !self.cache.is_enabled() {
            return None;
        }

        let cached = self.cache.try_get(cache_key);
        tracing::debug!(
            cache_key = %cache_key,
            hit = cached.is_some(),
            "Compiled template lookup"
        );
        cached
    }

    fn compile_and_execute(
        &self,
        template_key: &str,
        cache_key: &CacheKey,
        source: &str,
        variables: &Variables,
    ) -> String {
        let compiled = match self.compiler.compile(source) {
            Ok(compiled) => compiled,
            Err(e) => {
                RenderMetrics::record_compile_failure(e.kind());
                match e {
                    CompileError::NoDirectives => tracing::debug!(
                        template_key = %template_key,
                        "Template has no directives, returning it verbatim"
                    ),
                    CompileError::Syntax(ref reason) => tracing::warn!(
                        template_key = %template_key,
                        error = %reason,
                        "Template failed to compile, returning it verbatim"
                    ),
                }
                RenderMetrics::record_fallback();
                return source.to_string();
            }
        };

        if self.cache.is_enabled() {
            self.cache.set(cache_key, compiled.clone());
        }

        self.execute_or_fallback(template_key, &compiled, variables)
    }

    fn execute_or_fallback(
        &self,
        template_key: &str,
        compiled: &CompiledTemplate,
        variables: &Variables,
    ) -> String {
        match self.compiler.execute(compiled, &variables.bind()) {
            Ok(rendered) => rendered,
            Err(e) => {
                RenderMetrics::record_exec_failure();
                RenderMetrics::record_fallback();
                tracing::warn!(
                    template_key = %template_key,
                    variables = variables.shape(),
                    empty_variables = variables.is_empty(),
                    error = %e,
                    "Template execution failed, returning it verbatim"
                );
                compiled.source().to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::store::MemoryCacheStore;
    use serde_json::json;
    use std::collections::HashMap;

    fn create_engine(store: Arc<MemoryCacheStore>) -> TemplateEngine {
        TemplateEngine::new(store, &CacheConfig::default(), &EngineConfig::default())
    }

    #[test]
    fn test_render_populates_store() {
        let store = Arc::new(MemoryCacheStore::new());
        let engine = create_engine(store.clone());

        let rendered = engine.render(
            "templateKey",
            json!({"title": "My Blog", "greeting": "Hello John!"}),
            "{{title}}. {{greeting}}",
        );

        assert_eq!(rendered, "My Blog. Hello John!");
        assert!(store
            .try_get("templateKey_CompiledTemplate")
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_render_hit_ignores_template_argument() {
        let store = Arc::new(MemoryCacheStore::new());
        let engine = create_engine(store);

        engine.render("greeting", json!({"name": "Ann"}), "Hi {{name}}");
        let rendered = engine.render("greeting", json!({"name": "Bob"}), "Bye {{name}}");

        assert_eq!(rendered, "Hi Bob");
    }

    #[test]
    fn test_render_plain_text_not_cached() {
        let store = Arc::new(MemoryCacheStore::new());
        let engine = create_engine(store.clone());

        let rendered = engine.render("plain", json!({}), "My Blog. Hello John!");

        assert_eq!(rendered, "My Blog. Hello John!");
        assert!(store.is_empty());
    }

    #[test]
    fn test_render_broken_template_falls_back() {
        let store = Arc::new(MemoryCacheStore::new());
        let engine = create_engine(store.clone());

        let rendered = engine.render("broken", json!({"name": "Ann"}), "Hello {{name");

        assert_eq!(rendered, "Hello {{name");
        assert!(store.is_empty());
    }

    #[test]
    fn test_render_exec_failure_falls_back_but_caches() {
        let store = Arc::new(MemoryCacheStore::new());
        let engine = TemplateEngine::new(
            store.clone(),
            &CacheConfig::default(),
            &EngineConfig {
                strict_mode: true,
                ..Default::default()
            },
        );

        let rendered = engine.render("strict", json!({}), "Hello {{name}}");

        assert_eq!(rendered, "Hello {{name}}");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_render_with_mapping() {
        let engine = create_engine(Arc::new(MemoryCacheStore::new()));

        let mut variables = HashMap::new();
        variables.insert("title".to_string(), "My Blog".to_string());
        variables.insert("greeting".to_string(), "Hello John!".to_string());

        let rendered = engine.render("templateKey", variables, "{{title}}. {{greeting}}");
        assert_eq!(rendered, "My Blog. Hello John!");
    }

    #[test]
    fn test_render_cache_disabled_never_stores() {
        let store = Arc::new(MemoryCacheStore::new());
        let engine = TemplateEngine::new(
            store.clone(),
            &CacheConfig {
                enabled: false,
                ..Default::default()
            },
            &EngineConfig::default(),
        );

        engine.render("greeting", json!({"name": "Ann"}), "Hi {{name}}");
        let rendered = engine.render("greeting", json!({"name": "Bob"}), "Bye {{name}}");

        assert_eq!(rendered, "Bye Bob");
        assert!(store.is_empty());
    }

    #[test]
    fn test_render_async_supplier_error_propagates() {
        let engine = create_engine(Arc::new(MemoryCacheStore::new()));

        let result = tokio_test::block_on(engine.render_async("missing", json!({}), || async {
            Err::<String, _>(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "template file missing",
            ))
        }));

        match result {
            Err(RenderError::SourceUnavailable { template_key, .. }) => {
                assert_eq!(template_key, "missing");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_render_async_shares_cache_with_render() {
        let engine = create_engine(Arc::new(MemoryCacheStore::new()));

        engine.render("shared", json!({"name": "Ann"}), "Hi {{name}}");
        let rendered = engine
            .render_async("shared", json!({"name": "Bob"}), || async {
                Ok::<_, std::io::Error>("unused {{name}}".to_string())
            })
            .await
            .unwrap();

        assert_eq!(rendered, "Hi Bob");
    }
}
