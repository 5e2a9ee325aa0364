//! Adapter around the handlebars expression engine

use std::sync::Arc;

use handlebars::Handlebars;
use serde_json::Value;

use crate::config::EngineConfig;

use super::types::{CompileError, CompiledTemplate, ExecError};

/// Name of the single template held by each compiled registry
const TEMPLATE_NAME: &str = "template";

/// Opening marker of every handlebars directive
const DIRECTIVE_OPEN: &str = "{{";

/// Compiles template sources and executes compiled templates.
#[derive(Debug, Clone)]
pub struct TemplateCompiler {
    config: EngineConfig,
}

impl Default for TemplateCompiler {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl TemplateCompiler {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Compile a template source.
    ///
    /// A source without any `{{` is rejected as `NoDirectives`: there is
    /// nothing to substitute, so the caller falls back to the raw text.
    pub fn compile(&self, source: &str) -> Result<CompiledTemplate, CompileError> {
        if !source.contains(DIRECTIVE_OPEN) {
            return Err(CompileError::NoDirectives);
        }

        let mut registry = Handlebars::new();
        registry.set_strict_mode(self.config.strict_mode);
        if !self.config.escape_html {
            registry.register_escape_fn(handlebars::no_escape);
        }

        registry
            .register_template_string(TEMPLATE_NAME, source)
            .map_err(|e| CompileError::Syntax(e.to_string()))?;

        Ok(CompiledTemplate::new(Arc::from(source), registry))
    }

    /// Execute a compiled template against bound variables
    pub fn execute(&self, compiled: &CompiledTemplate, input: &Value) -> Result<String, ExecError> {
        compiled
            .registry()
            .render(TEMPLATE_NAME, input)
            .map_err(|e| ExecError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compile_and_execute() {
        let compiler = TemplateCompiler::default();
        let compiled = compiler.compile("{{title}}. {{greeting}}").unwrap();

        let rendered = compiler
            .execute(
                &compiled,
                &json!({"title": "My Blog", "greeting": "Hello John!"}),
            )
            .unwrap();
        assert_eq!(rendered, "My Blog. Hello John!");
        assert_eq!(compiled.source(), "{{title}}. {{greeting}}");
    }

    #[test]
    fn test_compile_plain_text_has_no_directives() {
        let compiler = TemplateCompiler::default();
        assert_eq!(
            compiler.compile("My Blog. Hello John!"),
            Err(CompileError::NoDirectives)
        );
    }

    #[test]
    fn test_compile_broken_syntax() {
        let compiler = TemplateCompiler::default();
        let err = compiler.compile("Hello {{name").unwrap_err();
        assert_eq!(err.kind(), "syntax");
    }

    #[test]
    fn test_compile_unclosed_block() {
        let compiler = TemplateCompiler::default();
        assert!(matches!(
            compiler.compile("{{#if vip}}Welcome back"),
            Err(CompileError::Syntax(_))
        ));
    }

    #[test]
    fn test_execute_missing_variable_renders_empty() {
        let compiler = TemplateCompiler::default();
        let compiled = compiler.compile("Hello {{name}}!").unwrap();

        let rendered = compiler.execute(&compiled, &json!({})).unwrap();
        assert_eq!(rendered, "Hello !");
    }

    #[test]
    fn test_execute_missing_variable_strict_mode() {
        let compiler = TemplateCompiler::new(EngineConfig {
            strict_mode: true,
            ..Default::default()
        });
        let compiled = compiler.compile("Hello {{name}}!").unwrap();

        assert!(compiler.execute(&compiled, &json!({})).is_err());
    }

    #[test]
    fn test_execute_escapes_html_by_default() {
        let compiler = TemplateCompiler::default();
        let compiled = compiler.compile("{{show}}").unwrap();

        let rendered = compiler
            .execute(&compiled, &json!({"show": "Tom & Jerry"}))
            .unwrap();
        assert_eq!(rendered, "Tom &amp; Jerry");
    }

    #[test]
    fn test_execute_without_escaping() {
        let compiler = TemplateCompiler::new(EngineConfig {
            escape_html: false,
            ..Default::default()
        });
        let compiled = compiler.compile("{{show}}").unwrap();

        let rendered = compiler
            .execute(&compiled, &json!({"show": "Tom & Jerry"}))
            .unwrap();
        assert_eq!(rendered, "Tom & Jerry");
    }

    #[test]
    fn test_execute_nested_document() {
        let compiler = TemplateCompiler::default();
        let compiled = compiler
            .compile("Order {{order.id}} ships via {{order.carrier}}")
            .unwrap();

        let rendered = compiler
            .execute(
                &compiled,
                &json!({"order": {"id": "ORD-123", "carrier": "FedEx"}}),
            )
            .unwrap();
        assert_eq!(rendered, "Order ORD-123 ships via FedEx");
    }

    #[test]
    fn test_compiled_templates_compare_by_source() {
        let compiler = TemplateCompiler::default();
        let a = compiler.compile("{{title}}").unwrap();
        let b = compiler.compile("{{title}}").unwrap();
        let c = compiler.compile("{{greeting}}").unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
