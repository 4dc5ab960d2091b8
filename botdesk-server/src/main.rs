//! botdesk CLI: run the webhook server. Config from env and optional CLI args.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use botdesk_core::init_tracing;
use botdesk_server::{router, AppState, ServerConfig};
use storage::SqliteBotStore;

#[derive(Parser)]
#[command(name = "botdesk")]
#[command(about = "Telegram bot webhook server", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the webhook server (config from env; bind can override BIND_ADDR).
    Serve {
        #[arg(short, long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind } => {
            let mut config = ServerConfig::load().context("Load server config from env")?;
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }

            init_tracing(config.log_file.as_deref())?;

            let store = SqliteBotStore::new(&config.database_url)
                .await
                .with_context(|| format!("Open bot store at {}", config.database_url))?;

            let state = AppState::new(config, Arc::new(store));
            router::serve(state).await.context("Run HTTP server")
        }
    }
}
