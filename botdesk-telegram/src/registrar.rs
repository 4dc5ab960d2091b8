//! Webhook registration with exponential-backoff retry.
//!
//! The administrative counterpart of the webhook controller: unlike inbound
//! processing, failures here propagate to the caller.

use std::sync::Arc;
use std::time::Duration;

use botdesk_core::{BotConfig, DispatchError, Result};
use storage::BotConfigStore;
use tracing::{info, warn};

use crate::gateway::{SetWebhookParams, TelegramGateway};

const MAX_ATTEMPTS: u32 = 3;

/// Delay before retry `attempt` (0-based): 1s, 2s.
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_millis(2u64.pow(attempt) * 1000)
}

/// Idempotently configures a bot's webhook against the Telegram API.
pub struct WebhookRegistrar {
    store: Arc<dyn BotConfigStore>,
    gateway: TelegramGateway,
    /// Public base URL used to derive webhook URLs when no custom URL is given.
    base_url: Option<String>,
}

impl WebhookRegistrar {
    pub fn new(
        store: Arc<dyn BotConfigStore>,
        gateway: TelegramGateway,
        base_url: Option<String>,
    ) -> Self {
        Self {
            store,
            gateway,
            base_url: base_url.map(|b| b.trim_end_matches('/').to_string()),
        }
    }

    /// Effective webhook URL: the explicit one, else derived from the
    /// configured base URL.
    fn effective_url(&self, bot: &BotConfig, custom_url: Option<&str>) -> Result<String> {
        if let Some(url) = custom_url {
            return Ok(url.to_string());
        }
        match &self.base_url {
            Some(base) => Ok(format!("{}/api/bot/telegram/bots/{}/webhook", base, bot.id)),
            None => Err(DispatchError::Config(
                "no webhook URL given and no base URL configured".to_string(),
            )),
        }
    }

    /// Registers the bot's webhook, retrying setWebhook up to 3 times with
    /// 1s/2s delays. Re-registration overwrites any previous webhook (one
    /// URL per bot token). On success the URL is verified via getWebhookInfo
    /// and persisted best-effort; returns the effective URL.
    pub async fn register(&self, bot: &BotConfig, custom_url: Option<&str>) -> Result<String> {
        let url = self.effective_url(bot, custom_url)?;
        let params = SetWebhookParams {
            url: url.clone(),
            // Telegram rejects ':' in secret tokens, so the bot id (not the
            // bot token) authenticates inbound deliveries.
            secret_token: Some(bot.id.clone()),
            allowed_updates: vec!["message".to_string(), "callback_query".to_string()],
            drop_pending_updates: true,
        };

        let mut last_error: Option<DispatchError> = None;
        for attempt in 0..MAX_ATTEMPTS {
            match self.gateway.set_webhook(&bot.token, &params).await {
                Ok(_) => {
                    info!(bot_id = %bot.id, url = %url, attempt, "webhook registered");
                    self.verify_and_persist(bot, &url).await;
                    return Ok(url);
                }
                Err(err) => {
                    warn!(bot_id = %bot.id, attempt, error = %err, "setWebhook attempt failed");
                    last_error = Some(err);
                    if attempt + 1 < MAX_ATTEMPTS {
                        tokio::time::sleep(backoff_delay(attempt)).await;
                    }
                }
            }
        }

        Err(DispatchError::WebhookRegistrationFailed(
            last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "setWebhook failed".to_string()),
        ))
    }

    /// Post-success verification and persistence. Telegram-side state is
    /// already correct at this point, so neither step can fail registration.
    async fn verify_and_persist(&self, bot: &BotConfig, url: &str) {
        match self.gateway.get_webhook_info(&bot.token).await {
            Ok(info) if info.url == url => {}
            Ok(info) => {
                warn!(
                    bot_id = %bot.id,
                    expected = %url,
                    actual = %info.url,
                    "webhook info does not match registered url"
                );
            }
            Err(err) => {
                warn!(bot_id = %bot.id, error = %err, "getWebhookInfo verification failed");
            }
        }

        if let Err(err) = self.store.persist_webhook_url(&bot.id, Some(url)).await {
            warn!(bot_id = %bot.id, error = %err, "failed to persist webhook url");
        }
    }

    /// Removes the bot's webhook on the Telegram side and clears the
    /// persisted URL. Deletion of a bot must go through this first.
    pub async fn deregister(&self, bot: &BotConfig) -> Result<()> {
        self.gateway.delete_webhook(&bot.token).await?;
        info!(bot_id = %bot.id, "webhook deregistered");

        if let Err(err) = self.store.persist_webhook_url(&bot.id, None).await {
            warn!(bot_id = %bot.id, error = %err, "failed to clear webhook url");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_delays() {
        assert_eq!(backoff_delay(0), Duration::from_secs(1));
        assert_eq!(backoff_delay(1), Duration::from_secs(2));
        assert_eq!(backoff_delay(2), Duration::from_secs(4));
    }
}
