//! # botdesk-telegram
//!
//! The webhook-ingestion → rule-resolution → Telegram-response pipeline.
//!
//! An inbound [`update::Update`] enters through [`webhook::WebhookController`],
//! which resolves the owning bot via [`storage::BotConfigStore`], matches the
//! message with [`matcher`], renders the configured response with [`render`],
//! and sends it through [`gateway::TelegramGateway`]. The controller always
//! acknowledges success to Telegram; [`registrar::WebhookRegistrar`] is the
//! administrative counterpart that provisions webhooks with retry/backoff.

pub mod commands;
pub mod gateway;
pub mod matcher;
pub mod registrar;
pub mod render;
pub mod update;
pub mod webhook;

pub use commands::{sync_commands, validate_token};
pub use gateway::{
    BotCommand, BotIdentity, SetWebhookParams, TelegramGateway, WebhookInfo, DEFAULT_API_BASE,
};
pub use matcher::{resolve, Match};
pub use registrar::WebhookRegistrar;
pub use render::{render, ReplyMarkup, SendRequest};
pub use update::{CallbackQuery, ChatRef, IncomingMessage, MessageEntity, Update, UserRef};
pub use webhook::{Ack, BotLookup, DispatchOutcome, WebhookController};
