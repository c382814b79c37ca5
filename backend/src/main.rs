use std::sync::Arc;

use anyhow::Context as _;
use backend::{AppState, config, create_router};
use recipe_ai_harness::vendors::openai::{OpenAiClientConfig, OpenAiProvider};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config::init();
    recipe_core::observability::init_observability();

    let settings = config::ServerConfig::from_env();
    let client_config = OpenAiClientConfig::from_env()?.base_url(settings.base_url.clone());
    let provider = OpenAiProvider::new(client_config)?;
    let state = AppState::new(Arc::new(provider), settings.model.clone())
        .options(settings.generation_options());

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;
    info!(
        addr = %settings.bind_addr,
        model = %settings.model,
        version = env!("CARGO_PKG_VERSION"),
        "recipe backend listening"
    );

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
