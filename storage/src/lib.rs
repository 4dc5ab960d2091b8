//! # storage
//!
//! Bot configuration persistence. [`BotConfigStore`] is the contract the
//! dispatch pipeline depends on; [`SqliteBotStore`] implements it over SQLite
//! with the menu and auto-reply lists stored as JSON document columns.

pub mod bot_store;
pub mod error;
pub mod sqlite_pool;
pub mod store;

pub use bot_store::SqliteBotStore;
pub use error::StorageError;
pub use sqlite_pool::SqlitePoolManager;
pub use store::BotConfigStore;
