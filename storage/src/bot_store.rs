//! SQLite bot store: the `bots` table plus [`BotConfigStore`] queries.
//!
//! Menus and auto-reply rules are stored as JSON document columns so the
//! persisted shape stays the documented one (camelCase keys), independent of
//! the relational schema around it.

use async_trait::async_trait;
use botdesk_core::{AutoReplyRule, BotConfig, BotSettings, BotStatus, MenuItem};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::info;

use crate::error::StorageError;
use crate::sqlite_pool::SqlitePoolManager;
use crate::store::BotConfigStore;

/// Raw `bots` row; JSON columns are expanded into [`BotConfig`] after fetch.
#[derive(Debug, FromRow)]
struct BotRow {
    id: String,
    name: String,
    token: String,
    is_enabled: bool,
    status: String,
    menus: String,
    auto_replies: String,
    webhook_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl BotRow {
    fn into_config(self) -> Result<BotConfig, StorageError> {
        let menus: Vec<MenuItem> = serde_json::from_str(&self.menus)?;
        let auto_replies: Vec<AutoReplyRule> = serde_json::from_str(&self.auto_replies)?;
        let status = match self.status.as_str() {
            "inactive" => BotStatus::Inactive,
            _ => BotStatus::Active,
        };
        Ok(BotConfig {
            id: self.id,
            name: self.name,
            token: self.token,
            is_enabled: self.is_enabled,
            status,
            menus,
            auto_replies,
            settings: BotSettings {
                webhook_url: self.webhook_url,
            },
            created_at: self.created_at,
        })
    }
}

fn status_str(status: BotStatus) -> &'static str {
    match status {
        BotStatus::Active => "active",
        BotStatus::Inactive => "inactive",
    }
}

/// Bot configuration store over SQLite.
#[derive(Clone)]
pub struct SqliteBotStore {
    pool_manager: SqlitePoolManager,
}

impl SqliteBotStore {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let store = Self { pool_manager };
        store.init().await?;
        Ok(store)
    }

    async fn init(&self) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS bots (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                token TEXT NOT NULL UNIQUE,
                is_enabled INTEGER NOT NULL,
                status TEXT NOT NULL,
                menus TEXT NOT NULL,
                auto_replies TEXT NOT NULL,
                webhook_url TEXT,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_bots_token ON bots(token)")
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Inserts or fully replaces the bot with the same id.
    pub async fn save(&self, bot: &BotConfig) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();
        let menus = serde_json::to_string(&bot.menus)?;
        let auto_replies = serde_json::to_string(&bot.auto_replies)?;

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO bots
                (id, name, token, is_enabled, status, menus, auto_replies, webhook_url, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&bot.id)
        .bind(&bot.name)
        .bind(&bot.token)
        .bind(bot.is_enabled)
        .bind(status_str(bot.status))
        .bind(&menus)
        .bind(&auto_replies)
        .bind(&bot.settings.webhook_url)
        .bind(bot.created_at)
        .execute(pool)
        .await?;

        info!(bot_id = %bot.id, name = %bot.name, "saved bot configuration");
        Ok(())
    }

    pub async fn find_all(&self) -> Result<Vec<BotConfig>, StorageError> {
        let pool = self.pool_manager.pool();
        let rows: Vec<BotRow> = sqlx::query_as("SELECT * FROM bots ORDER BY created_at")
            .fetch_all(pool)
            .await?;
        rows.into_iter().map(BotRow::into_config).collect()
    }

    /// Flips the lifecycle status (and the matching enabled flag).
    pub async fn update_status(&self, id: &str, status: BotStatus) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();
        let result = sqlx::query("UPDATE bots SET status = ?, is_enabled = ? WHERE id = ?")
            .bind(status_str(status))
            .bind(status == BotStatus::Active)
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("bot {}", id)));
        }
        info!(bot_id = %id, status = status_str(status), "updated bot status");
        Ok(())
    }

    /// Deletes a bot; returns true if a row was removed.
    pub async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let pool = self.pool_manager.pool();
        let result = sqlx::query("DELETE FROM bots WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl BotConfigStore for SqliteBotStore {
    async fn find_by_token(&self, token: &str) -> Result<Option<BotConfig>, StorageError> {
        let pool = self.pool_manager.pool();
        let row: Option<BotRow> = sqlx::query_as("SELECT * FROM bots WHERE token = ?")
            .bind(token)
            .fetch_optional(pool)
            .await?;
        row.map(BotRow::into_config).transpose()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<BotConfig>, StorageError> {
        let pool = self.pool_manager.pool();
        let row: Option<BotRow> = sqlx::query_as("SELECT * FROM bots WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        row.map(BotRow::into_config).transpose()
    }

    async fn persist_webhook_url(&self, id: &str, url: Option<&str>) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();
        let result = sqlx::query("UPDATE bots SET webhook_url = ? WHERE id = ?")
            .bind(url)
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("bot {}", id)));
        }
        info!(bot_id = %id, url = ?url, "persisted webhook url");
        Ok(())
    }
}
