use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::sync::broadcast;

use ara_template_engine::config::Settings;
use ara_template_engine::error::AppError;
use ara_template_engine::tasks::CacheCleanupTask;
use ara_template_engine::telemetry::init_tracing;
use ara_template_engine::template::{create_cache_store, TemplateEngine};

const USAGE: &str = "ara-render <template-key> <template-file> <variables-json-file>";

struct RenderArgs {
    template_key: String,
    template_path: PathBuf,
    variables_path: PathBuf,
}

impl RenderArgs {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, AppError> {
        let mut next = |name: &str| {
            args.next()
                .ok_or_else(|| AppError::Usage(format!("missing <{}>; {}", name, USAGE)))
        };

        Ok(Self {
            template_key: next("template-key")?,
            template_path: PathBuf::from(next("template-file")?),
            variables_path: PathBuf::from(next("variables-json-file")?),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::new().context("Failed to load configuration")?;

    // Initialize tracing
    init_tracing(&settings.logging)?;

    let args = RenderArgs::parse(std::env::args().skip(1))?;

    let store = create_cache_store();
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

    // Start cache cleanup in background
    let cleanup_task = CacheCleanupTask::new(&settings.cache, store.clone(), shutdown_rx);
    let cleanup_handle = tokio::spawn(async move {
        cleanup_task.run().await;
    });

    let engine = TemplateEngine::from_settings(store, &settings);
    let result = render(&engine, args).await;

    // Stop background tasks before reporting
    let _ = shutdown_tx.send(());
    let _ = cleanup_handle.await;

    let rendered = result?;
    println!("{}", rendered);
    Ok(())
}

async fn render(engine: &TemplateEngine, args: RenderArgs) -> Result<String, AppError> {
    let raw_variables = tokio::fs::read_to_string(&args.variables_path).await?;
    let variables: serde_json::Value = serde_json::from_str(&raw_variables)?;

    tracing::info!(
        template_key = %args.template_key,
        template_path = %args.template_path.display(),
        "Rendering template"
    );

    let template_path = args.template_path;
    let rendered = engine
        .render_async(&args.template_key, variables, move || {
            tokio::fs::read_to_string(template_path)
        })
        .await?;

    Ok(rendered)
}
