//! Inbound webhook handlers: the three URL shapes Telegram can be pointed at.
//!
//! All three answer `200 {"success": true}` no matter what. The body is taken
//! as raw bytes and parsed by hand: the `Json` (or `String`) extractor would
//! reject a malformed or non-UTF-8 payload with a 4xx before the handler runs,
//! and any non-2xx makes Telegram redeliver the same broken update.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use botdesk_telegram::{Ack, BotLookup, Update};
use tracing::warn;

use crate::state::AppState;

/// Header Telegram echoes back when a secret token was set at registration.
const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// POST /api/bot/telegram/webhook/:token
pub async fn webhook_by_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
    body: Bytes,
) -> Json<Ack> {
    dispatch(&state, BotLookup::ByToken(token), &body).await
}

/// POST /api/bot/telegram/bots/:id/webhook
///
/// The route the registrar provisions; authenticated by the secret header.
pub async fn webhook_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Ack> {
    let secret = headers
        .get(SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    dispatch(&state, BotLookup::ById { id, secret }, &body).await
}

/// POST /api/bot/telegram/webhook (global; bot identified from the update).
pub async fn webhook_global(State(state): State<AppState>, body: Bytes) -> Json<Ack> {
    dispatch(&state, BotLookup::FromUpdate, &body).await
}

async fn dispatch(state: &AppState, lookup: BotLookup, body: &[u8]) -> Json<Ack> {
    match serde_json::from_slice::<Update>(body) {
        Ok(update) => Json(state.controller.handle_update(lookup, &update).await),
        Err(err) => {
            warn!(error = %err, "unparseable webhook body dropped");
            Json(Ack::ok())
        }
    }
}
