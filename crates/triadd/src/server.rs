//! HTTP server for triadd.

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use triad_common::ChatBackend;

use crate::clients::{ChatCompletionsClient, MessagesClient};
use crate::config::Config;
use crate::routes;

/// Application state shared across handlers: the three backend handles,
/// constructed once at startup and immutable afterwards.
pub struct AppState {
    /// Provider A: the caller picks the model per request.
    pub selectable: Arc<dyn ChatBackend>,
    /// Provider B: model and label are pinned.
    pub fixed: Arc<dyn ChatBackend>,
    /// The review-stage backend; never subject to provider choice.
    pub reviewer: Arc<dyn ChatBackend>,
}

impl AppState {
    pub fn new(
        selectable: Arc<dyn ChatBackend>,
        fixed: Arc<dyn ChatBackend>,
        reviewer: Arc<dyn ChatBackend>,
    ) -> Self {
        Self {
            selectable,
            fixed,
            reviewer,
        }
    }

    /// Build the real clients from config.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(ChatCompletionsClient::new(
                &config.groq_base_url,
                &config.groq_api_key,
            )),
            Arc::new(ChatCompletionsClient::new(
                &config.openai_base_url,
                &config.openai_api_key,
            )),
            Arc::new(MessagesClient::new(
                &config.anthropic_base_url,
                &config.anthropic_api_key,
            )),
        )
    }
}

/// Assemble the router: pipeline endpoints plus the static front-end.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::review_routes())
        .merge(routes::ui_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until the process is stopped.
pub async fn run(config: Config) -> Result<()> {
    let state = Arc::new(AppState::from_config(&config));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
