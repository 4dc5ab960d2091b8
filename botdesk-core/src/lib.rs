//! # botdesk-core
//!
//! Domain model shared by the botdesk crates: the bot configuration document
//! (menus, auto-reply rules, response specs), the resolved response variants
//! used by the renderer, the dispatch error taxonomy, and tracing setup.

pub mod error;
pub mod logger;
pub mod response;
pub mod types;

pub use error::{DispatchError, Result};
pub use logger::init_tracing;
pub use response::{
    Button, ButtonGrid, ButtonType, KeyboardLayout, MediaKind, ParseMode, ResolvedBody,
    ResolvedResponse, ResponseSpec, ResponseType,
};
pub use types::{
    is_valid_token, AutoReplyRule, BotConfig, BotSettings, BotStatus, MenuItem, RuleType,
};
