//! Router configuration and server setup.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::handlers;
use crate::state::AppState;

/// Builds the full route table.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        // Inbound webhook routes (always 200)
        .route("/api/bot/telegram/webhook", post(handlers::webhook_global))
        .route(
            "/api/bot/telegram/webhook/:token",
            post(handlers::webhook_by_token),
        )
        .route(
            "/api/bot/telegram/bots/:id/webhook",
            post(handlers::webhook_by_id),
        )
        // Webhook administration
        .route(
            "/api/bot/telegram/bots/:id/webhook-config",
            get(handlers::get_webhook_config)
                .put(handlers::put_webhook_config)
                .delete(handlers::delete_webhook_config),
        )
        .route(
            "/api/bot/telegram/bots/:id/commands/sync",
            post(handlers::sync_commands),
        )
        .layer(cors)
        .with_state(state)
}

/// Binds the listener and runs the server until it is shut down.
pub async fn serve(state: AppState) -> Result<(), std::io::Error> {
    let addr = state.config.bind_addr.clone();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("botdesk server listening on {}", addr);
    axum::serve(listener, create_router(state)).await
}
