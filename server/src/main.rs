mod config;
mod error;
mod llm;
mod routes;
mod services;
mod state;

use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, ".env present but unreadable"),
    }

    let config = config::AppConfig::from_env()?;

    // A missing API key is not fatal: requests may carry their own.
    let client = llm::LlmClient::from_env()?;
    let models = state::ModelCatalog::new(client.model(), client.models().to_vec());
    tracing::info!(model = client.model(), available = models.available.len(), "image generation client initialized");

    let theme = services::theme::ThemeStore::load(config.theme_file.clone()).await;
    tracing::info!(theme = theme.get().await.as_str(), "theme loaded");

    let state = state::AppState::new(&config, Arc::new(client), models, theme);
    let app = routes::app(state, config.static_dir.as_deref());

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = config.port, "sketchpad listening");
    axum::serve(listener, app).await?;
    Ok(())
}
