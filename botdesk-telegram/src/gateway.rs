//! Telegram Bot API gateway.
//!
//! Every operation is one HTTP POST to `{base}/bot{token}/{method}` with a
//! JSON body. The base URL is configurable so tests (and local setups) can
//! point at a mock server. Validation-style calls get a tighter 5s timeout;
//! sends use the client default. The gateway never retries sends — a failed
//! notification must not block webhook acknowledgment — retry policy lives in
//! the registrar.

use std::time::Duration;

use botdesk_core::{DispatchError, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::render::SendRequest;

/// Production Bot API host.
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Default timeout for send-style calls.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);
/// Timeout for validation/administration calls (getMe, webhook management).
const ADMIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Envelope every Bot API response arrives in.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    error_code: Option<i32>,
    #[serde(default)]
    description: Option<String>,
}

/// `getMe` result subset.
#[derive(Debug, Clone, Deserialize)]
pub struct BotIdentity {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
}

/// `getWebhookInfo` result subset.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookInfo {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub pending_update_count: Option<i64>,
}

/// `setWebhook` parameters.
#[derive(Debug, Clone, Serialize)]
pub struct SetWebhookParams {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_token: Option<String>,
    pub allowed_updates: Vec<String>,
    pub drop_pending_updates: bool,
}

/// One entry for `setMyCommands`.
#[derive(Debug, Clone, Serialize)]
pub struct BotCommand {
    pub command: String,
    pub description: String,
}

/// Stateless Bot API client; nothing is retained between calls.
#[derive(Clone)]
pub struct TelegramGateway {
    client: Client,
    base_url: String,
}

impl TelegramGateway {
    /// Client construction only fails on TLS backend misconfiguration, which
    /// is a startup-time defect, so the panic is acceptable here.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn call<T: DeserializeOwned>(
        &self,
        token: &str,
        method: &str,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<T> {
        let url = format!("{}/bot{}/{}", self.base_url, token, method);
        debug!(method, "telegram api call");

        let response = self
            .client
            .post(&url)
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| DispatchError::Http(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| DispatchError::Http(e.to_string()))?;

        let parsed: ApiResponse<T> = match serde_json::from_slice(&bytes) {
            Ok(parsed) => parsed,
            Err(_) => {
                // Non-JSON body (proxy error page, truncated response).
                return Err(DispatchError::TelegramApi {
                    code: status.as_u16() as i32,
                    description: String::from_utf8_lossy(&bytes).into_owned(),
                });
            }
        };

        if !status.is_success() || !parsed.ok {
            return Err(DispatchError::TelegramApi {
                code: parsed.error_code.unwrap_or(status.as_u16() as i32),
                description: parsed
                    .description
                    .unwrap_or_else(|| "telegram api request failed".to_string()),
            });
        }

        parsed.result.ok_or_else(|| DispatchError::TelegramApi {
            code: status.as_u16() as i32,
            description: "ok response without result".to_string(),
        })
    }

    /// `getMe`: resolves the bot identity behind a token.
    pub async fn get_me(&self, token: &str) -> Result<BotIdentity> {
        self.call(token, "getMe", &serde_json::json!({}), ADMIN_TIMEOUT)
            .await
    }

    /// `setWebhook`: points Telegram at the given webhook URL.
    pub async fn set_webhook(&self, token: &str, params: &SetWebhookParams) -> Result<bool> {
        self.call(token, "setWebhook", &serde_json::json!(params), ADMIN_TIMEOUT)
            .await
    }

    /// `getWebhookInfo`: current webhook state for verification.
    pub async fn get_webhook_info(&self, token: &str) -> Result<WebhookInfo> {
        self.call(token, "getWebhookInfo", &serde_json::json!({}), ADMIN_TIMEOUT)
            .await
    }

    /// `deleteWebhook`: removes the registered webhook.
    pub async fn delete_webhook(&self, token: &str) -> Result<bool> {
        self.call(token, "deleteWebhook", &serde_json::json!({}), ADMIN_TIMEOUT)
            .await
    }

    /// `setMyCommands`: publishes the command menu.
    pub async fn set_my_commands(&self, token: &str, commands: &[BotCommand]) -> Result<bool> {
        self.call(
            token,
            "setMyCommands",
            &serde_json::json!({ "commands": commands }),
            ADMIN_TIMEOUT,
        )
        .await
    }

    /// Executes one rendered send request (sendMessage/sendPhoto/sendVideo/
    /// sendDocument). Fire-and-forget from the bot's perspective: no retry.
    pub async fn send(&self, token: &str, request: &SendRequest) -> Result<()> {
        let _: serde_json::Value = self
            .call(token, request.method(), &request.to_json(), SEND_TIMEOUT)
            .await?;
        Ok(())
    }

    /// `answerCallbackQuery`: acknowledges a button press.
    pub async fn answer_callback_query(&self, token: &str, callback_query_id: &str) -> Result<()> {
        let _: serde_json::Value = self
            .call(
                token,
                "answerCallbackQuery",
                &serde_json::json!({ "callback_query_id": callback_query_id }),
                SEND_TIMEOUT,
            )
            .await?;
        Ok(())
    }
}
