/*!
 * Admin HTTP surface.
 *
 * A small axum server exposing the batch jobs, the single-record sync job,
 * the phrasebook translator and the chat assistant to the dashboard. The
 * session layer in front of this API lives elsewhere; the routes themselves
 * carry no authentication.
 */

mod handlers;

use anyhow::{Context, Result};
use axum::{
    Router,
    http::Method,
    routing::{get, post},
};
use log::info;
use tower_http::cors::{Any, CorsLayer};

use crate::app_config::Config;
use crate::store::Repository;

/// Shared state for the request handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Record store
    pub repository: Repository,
}

/// Build the API router
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(handlers::health))
        .route(
            "/api/admin/batch-translate",
            post(handlers::batch_translate),
        )
        .route(
            "/api/admin/translate-record",
            post(handlers::translate_record),
        )
        .route("/api/translate", post(handlers::translate_text))
        .route("/api/chat", post(handlers::chat))
        .layer(cors)
        .with_state(state)
}

/// Run the admin server until the process terminates
pub async fn serve(config: Config, repository: Repository) -> Result<()> {
    let bind = config.server.bind.clone();
    let state = AppState { config, repository };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind admin server to {}", bind))?;

    info!("Admin server listening on http://{}", bind);

    axum::serve(listener, app)
        .await
        .context("Admin server failed")?;

    Ok(())
}
