//! Template types and error definitions

use std::fmt;
use std::sync::Arc;

use handlebars::Handlebars;
use thiserror::Error;

/// Reasons a template source cannot be compiled
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("Template contains no directives")]
    NoDirectives,

    #[error("Invalid template syntax: {0}")]
    Syntax(String),
}

impl CompileError {
    /// Short label used for metrics and structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            CompileError::NoDirectives => "no_directives",
            CompileError::Syntax(_) => "syntax",
        }
    }
}

/// Executing a compiled template against variables failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Template execution failed: {0}")]
pub struct ExecError(pub String);

/// Error surfaced to callers of the render pipeline.
///
/// Compile and execution failures never show up here, they degrade to the
/// raw template text. Only a template source that could not be obtained is
/// reported.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template source for '{template_key}' could not be resolved: {source}")]
    SourceUnavailable {
        template_key: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for render operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Executable form of a template source.
///
/// Cloning is cheap: the parsed template lives behind an `Arc` and is
/// shared by every clone handed out by the cache.
#[derive(Clone)]
pub struct CompiledTemplate {
    source: Arc<str>,
    registry: Arc<Handlebars<'static>>,
}

impl CompiledTemplate {
    pub(crate) fn new(source: Arc<str>, registry: Handlebars<'static>) -> Self {
        Self {
            source,
            registry: Arc::new(registry),
        }
    }

    /// The template text this was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    pub(crate) fn registry(&self) -> &Handlebars<'static> {
        &self.registry
    }
}

impl PartialEq for CompiledTemplate {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for CompiledTemplate {}

impl fmt::Debug for CompiledTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledTemplate")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
