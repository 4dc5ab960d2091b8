//! Server configuration from environment variables.

use anyhow::{bail, Result};
use botdesk_telegram::DEFAULT_API_BASE;

/// Runtime configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// SQLite connection string for the bot store.
    pub database_url: String,
    /// Optional log file the tracing output is teed to.
    pub log_file: Option<String>,
    /// Telegram Bot API base URL (overridable for local API servers and tests).
    pub telegram_api_url: String,
    /// Public base URL webhook URLs are derived from when no explicit URL is
    /// given at registration time.
    pub webhook_base_url: Option<String>,
}

impl ServerConfig {
    /// Loads configuration from the environment:
    /// `BIND_ADDR`, `DATABASE_URL`, `LOG_FILE`, `TELEGRAM_API_URL`,
    /// `WEBHOOK_BASE_URL`. Everything has a default except the two optionals.
    pub fn load() -> Result<Self> {
        let config = Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://botdesk.db".to_string()),
            log_file: std::env::var("LOG_FILE").ok(),
            telegram_api_url: std::env::var("TELEGRAM_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            webhook_base_url: std::env::var("WEBHOOK_BASE_URL").ok(),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.telegram_api_url.starts_with("http://")
            && !self.telegram_api_url.starts_with("https://")
        {
            bail!(
                "TELEGRAM_API_URL must be an http(s) URL, got: {}",
                self.telegram_api_url
            );
        }
        if let Some(base) = &self.webhook_base_url {
            // Telegram only delivers webhooks over HTTPS.
            if !base.starts_with("https://") {
                bail!("WEBHOOK_BASE_URL must be an https URL, got: {}", base);
            }
        }
        if self.bind_addr.parse::<std::net::SocketAddr>().is_err() {
            bail!("BIND_ADDR is not a valid socket address: {}", self.bind_addr);
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            database_url: "sqlite://botdesk.db".to_string(),
            log_file: None,
            telegram_api_url: DEFAULT_API_BASE.to_string(),
            webhook_base_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_http_api_url() {
        let config = ServerConfig {
            telegram_api_url: "ftp://api.telegram.org".to_string(),
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_plain_http_webhook_base() {
        let config = ServerConfig {
            webhook_base_url: Some("http://dash.example.com".to_string()),
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_bind_addr() {
        let config = ServerConfig {
            bind_addr: "not-an-addr".to_string(),
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
