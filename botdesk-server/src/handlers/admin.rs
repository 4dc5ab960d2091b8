//! Webhook administration handlers.
//!
//! Unlike the inbound webhook routes these are allowed to fail loudly:
//! registration exhausting its retries surfaces as 502.

use axum::{
    extract::{Path, State},
    Json,
};
use botdesk_core::BotConfig;
use serde::{Deserialize, Serialize};
use storage::BotConfigStore;

use crate::error::{ApiError, Result};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    /// Explicit webhook URL; derived from `WEBHOOK_BASE_URL` when omitted.
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WebhookConfigResponse {
    pub bot_id: String,
    /// URL recorded in the store at registration time.
    pub stored_url: Option<String>,
    /// URL Telegram currently reports via getWebhookInfo.
    pub telegram_url: String,
    pub pending_update_count: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub bot_id: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub bot_id: String,
    pub synced: usize,
}

async fn load_bot(state: &AppState, id: &str) -> Result<BotConfig> {
    state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("bot not found: {}", id)))
}

/// GET /api/bot/telegram/bots/:id/webhook-config
pub async fn get_webhook_config(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WebhookConfigResponse>> {
    let bot = load_bot(&state, &id).await?;
    let info = state.gateway.get_webhook_info(&bot.token).await?;
    Ok(Json(WebhookConfigResponse {
        bot_id: bot.id,
        stored_url: bot.settings.webhook_url,
        telegram_url: info.url,
        pending_update_count: info.pending_update_count,
    }))
}

/// PUT /api/bot/telegram/bots/:id/webhook-config
///
/// Registers (or re-registers; one webhook per token, the new URL wins) the
/// bot's webhook. Body is optional.
pub async fn put_webhook_config(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Option<Json<RegisterRequest>>,
) -> Result<Json<RegisterResponse>> {
    let bot = load_bot(&state, &id).await?;
    let custom_url = request.as_ref().and_then(|r| r.url.clone());
    let url = state.registrar.register(&bot, custom_url.as_deref()).await?;
    Ok(Json(RegisterResponse { bot_id: bot.id, url }))
}

/// DELETE /api/bot/telegram/bots/:id/webhook-config
pub async fn delete_webhook_config(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let bot = load_bot(&state, &id).await?;
    state.registrar.deregister(&bot).await?;
    Ok(Json(serde_json::json!({ "bot_id": bot.id, "deleted": true })))
}

/// POST /api/bot/telegram/bots/:id/commands/sync
pub async fn sync_commands(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SyncResponse>> {
    let bot = load_bot(&state, &id).await?;
    let synced = botdesk_telegram::sync_commands(&state.gateway, &bot).await?;
    Ok(Json(SyncResponse {
        bot_id: bot.id,
        synced,
    }))
}
