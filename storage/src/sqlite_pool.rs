//! SQLite connection pool wrapper.
//!
//! One pool per database URL; the database file is created if missing.
//! In-memory databases (`sqlite::memory:`) work too, which the tests rely on.

use std::str::FromStr;

use sqlx::{sqlite::SqliteConnectOptions, SqlitePool};
use tracing::info;

/// Holds the sqlx pool used by the bot store.
#[derive(Clone)]
pub struct SqlitePoolManager {
    pool: SqlitePool,
}

impl SqlitePoolManager {
    /// Opens (or creates) the database at `database_url` and builds a pool.
    /// Accepts sqlx URL forms (`sqlite://path.db`, `sqlite::memory:`) as well
    /// as bare file paths.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        info!(database_url, "opening sqlite pool");

        let options = if database_url.starts_with("sqlite:") {
            SqliteConnectOptions::from_str(database_url)?
        } else {
            SqliteConnectOptions::new().filename(database_url)
        }
        .create_if_missing(true);

        let pool = SqlitePool::connect_with(options).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
