//! Store contract the dispatch pipeline depends on.

use async_trait::async_trait;
use botdesk_core::BotConfig;

use crate::error::StorageError;

/// Read and webhook-persistence operations over bot configurations.
///
/// Lookups return `Ok(None)` when no bot matches; transport failures surface
/// as [`StorageError::Database`] and are mapped by the webhook controller to
/// its store-unavailable policy. Implementations must support concurrent
/// reads; no guarantee stronger than read-your-last-write is assumed.
#[async_trait]
pub trait BotConfigStore: Send + Sync {
    /// Finds the bot owning the given Telegram token.
    async fn find_by_token(&self, token: &str) -> Result<Option<BotConfig>, StorageError>;

    /// Finds a bot by its internal id.
    async fn find_by_id(&self, id: &str) -> Result<Option<BotConfig>, StorageError>;

    /// Records the registered webhook URL (or clears it with `None`).
    /// Re-registration overwrites; a webhook URL is unique per bot token.
    async fn persist_webhook_url(&self, id: &str, url: Option<&str>) -> Result<(), StorageError>;
}
