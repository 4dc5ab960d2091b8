//! Webhook controller: inbound update processing.
//!
//! One update runs Received → Parsed → Routed → Responded → Acknowledged, and
//! the terminal state is always Acknowledged. Telegram retries webhook
//! deliveries aggressively on non-2xx responses, and duplicate processing is
//! worse than dropping an unprocessable update, so every internal failure is
//! caught, logged, and swallowed at this boundary. Do not make this propagate.

use std::sync::Arc;

use botdesk_core::{BotConfig, DispatchError, Result};
use serde::Serialize;
use storage::{BotConfigStore, StorageError};
use tracing::{error, info, warn};

use crate::gateway::TelegramGateway;
use crate::matcher;
use crate::render;
use crate::update::Update;

/// How the inbound request identifies the target bot (the three supported
/// webhook URL shapes).
#[derive(Debug, Clone)]
pub enum BotLookup {
    /// `/webhook/{token}`: token in the path.
    ByToken(String),
    /// `/bots/{id}/webhook`: internal id in the path, secret from the
    /// `x-telegram-bot-api-secret-token` header. The registrar provisions
    /// the bot id as the secret (Telegram forbids `:` in secret tokens, so
    /// the raw bot token cannot be used).
    ById { id: String, secret: Option<String> },
    /// `/webhook` (global): bot hint extracted from the update itself.
    FromUpdate,
}

/// The acknowledgment returned to Telegram. Always `success: true`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// What processing actually did, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Number of send requests delivered to Telegram.
    pub sends: usize,
    /// Whether a callback query was answered.
    pub callback_answered: bool,
    /// Whether any outbound call failed (logged, never propagated).
    pub send_failures: usize,
}

/// Top-level entry point for inbound updates.
pub struct WebhookController {
    store: Arc<dyn BotConfigStore>,
    gateway: TelegramGateway,
}

impl WebhookController {
    pub fn new(store: Arc<dyn BotConfigStore>, gateway: TelegramGateway) -> Self {
        Self { store, gateway }
    }

    /// Processes one update and acknowledges it.
    ///
    /// Never fails: the return value is always a success acknowledgment,
    /// whatever happened inside.
    pub async fn handle_update(&self, lookup: BotLookup, update: &Update) -> Ack {
        match self.process(&lookup, update).await {
            Ok(outcome) => {
                info!(
                    sends = outcome.sends,
                    callback_answered = outcome.callback_answered,
                    send_failures = outcome.send_failures,
                    "step: update processed"
                );
            }
            Err(DispatchError::StoreUnavailable(msg)) => {
                // Infrastructure trouble; treated as "no matching bot" for
                // response purposes but logged loudly.
                error!(error = %msg, "step: store unavailable, update dropped");
            }
            Err(err) => {
                warn!(error = %err, "step: update dropped");
            }
        }
        Ack::ok()
    }

    async fn process(&self, lookup: &BotLookup, update: &Update) -> Result<DispatchOutcome> {
        // Received → Parsed
        let chat_id = update
            .chat_id()
            .ok_or_else(|| DispatchError::MalformedUpdate("no chat id in update".to_string()))?;

        // Parsed → Routed
        let bot = self.resolve_bot(lookup, update).await?;
        if !bot.is_enabled {
            return Err(DispatchError::BotDisabled(bot.id.clone()));
        }

        info!(bot_id = %bot.id, chat_id, "step: update routed");

        // Routed → Responded. Sends are sequential; ordering matters (the
        // reply goes out before the callback acknowledgment).
        let mut outcome = DispatchOutcome::default();

        let matched = update.text().and_then(|text| matcher::resolve(&bot, text));
        if let Some(m) = &matched {
            info!(bot_id = %bot.id, handler = %m.name(), "step: handler matched");
            for request in render::render(m.response(), chat_id) {
                match self.gateway.send(&bot.token, &request).await {
                    Ok(()) => outcome.sends += 1,
                    Err(err) => {
                        // Independent operations continue; see the module doc.
                        outcome.send_failures += 1;
                        warn!(
                            bot_id = %bot.id,
                            chat_id,
                            method = request.method(),
                            error = %err,
                            "outbound send failed"
                        );
                    }
                }
            }
        } else {
            info!(bot_id = %bot.id, chat_id, "step: no handler matched");
        }

        // A callback query is answered regardless of whether a text match
        // occurred or its send succeeded.
        if let Some(cq) = &update.callback_query {
            match self.gateway.answer_callback_query(&bot.token, &cq.id).await {
                Ok(()) => outcome.callback_answered = true,
                Err(err) => {
                    outcome.send_failures += 1;
                    warn!(bot_id = %bot.id, error = %err, "answerCallbackQuery failed");
                }
            }
        }

        Ok(outcome)
    }

    async fn resolve_bot(&self, lookup: &BotLookup, update: &Update) -> Result<BotConfig> {
        let found = match lookup {
            BotLookup::ByToken(token) => self.store.find_by_token(token).await,
            BotLookup::ById { id, secret } => {
                let bot = self.store.find_by_id(id).await;
                match bot {
                    Ok(Some(bot)) => {
                        // The provisioned secret is the bot id itself.
                        if secret.as_deref() != Some(bot.id.as_str()) {
                            return Err(DispatchError::ConfigNotFound(format!(
                                "secret mismatch for bot {}",
                                id
                            )));
                        }
                        Ok(Some(bot))
                    }
                    other => other,
                }
            }
            BotLookup::FromUpdate => match update.bot_hint() {
                Some(hint) => self.store.find_by_token(&hint).await,
                None => {
                    return Err(DispatchError::MalformedUpdate(
                        "no bot hint in update".to_string(),
                    ))
                }
            },
        };

        match found {
            Ok(Some(bot)) => Ok(bot),
            Ok(None) => Err(DispatchError::ConfigNotFound(format!("{:?}", lookup))),
            Err(StorageError::Database(msg)) => Err(DispatchError::StoreUnavailable(msg)),
            Err(err) => Err(DispatchError::StoreUnavailable(err.to_string())),
        }
    }
}
