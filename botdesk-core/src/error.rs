//! Dispatch error taxonomy.
//!
//! Everything that can go wrong between receiving an update and acknowledging
//! it. The webhook controller recovers from all of these locally; only
//! [`DispatchError::WebhookRegistrationFailed`] propagates to callers (it is
//! an administrative action, not an inbound-update path).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatchError {
    /// No bot matches the inbound request's identifying token or id.
    #[error("bot configuration not found: {0}")]
    ConfigNotFound(String),

    /// Bot exists but is not enabled for inbound processing.
    #[error("bot is disabled: {0}")]
    BotDisabled(String),

    /// Missing chat id or otherwise unusable update payload.
    #[error("malformed update: {0}")]
    MalformedUpdate(String),

    /// Underlying configuration store unreachable; logged at error severity.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Outbound call rejected by the Telegram Bot API.
    #[error("telegram api error ({code}): {description}")]
    TelegramApi { code: i32, description: String },

    /// setWebhook retries exhausted.
    #[error("webhook registration failed: {0}")]
    WebhookRegistrationFailed(String),

    #[error("config error: {0}")]
    Config(String),

    /// Transport-level failure (connect, timeout, body read).
    #[error("http error: {0}")]
    Http(String),
}

pub type Result<T> = std::result::Result<T, DispatchError>;
