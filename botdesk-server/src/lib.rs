//! # botdesk-server
//!
//! HTTP surface over the dispatch pipeline: the three Telegram webhook routes
//! (token-in-path, id-in-path with secret header, global), webhook
//! administration, and a health endpoint.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, Result};
pub use router::{create_router, serve};
pub use state::AppState;
