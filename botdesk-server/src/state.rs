//! Application state shared across handlers.

use std::sync::Arc;

use botdesk_telegram::{TelegramGateway, WebhookController, WebhookRegistrar};
use storage::SqliteBotStore;

use crate::config::ServerConfig;

/// Shared state: one store pool, one HTTP client, the two pipeline entry
/// points built on top of them.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub store: Arc<SqliteBotStore>,
    pub gateway: TelegramGateway,
    pub controller: Arc<WebhookController>,
    pub registrar: Arc<WebhookRegistrar>,
}

impl AppState {
    pub fn new(config: ServerConfig, store: Arc<SqliteBotStore>) -> Self {
        let gateway = TelegramGateway::new(config.telegram_api_url.clone());
        let controller = Arc::new(WebhookController::new(store.clone(), gateway.clone()));
        let registrar = Arc::new(WebhookRegistrar::new(
            store.clone(),
            gateway.clone(),
            config.webhook_base_url.clone(),
        ));
        Self {
            config: Arc::new(config),
            store,
            gateway,
            controller,
            registrar,
        }
    }
}
