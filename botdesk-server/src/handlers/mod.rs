//! Request handlers.

mod admin;
mod health;
mod webhook;

pub use admin::{delete_webhook_config, get_webhook_config, put_webhook_config, sync_commands};
pub use health::health;
pub use webhook::{webhook_by_id, webhook_by_token, webhook_global};
