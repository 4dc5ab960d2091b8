//! Bot configuration document: bot identity, menu commands, auto-reply rules.
//!
//! Field names serialize in camelCase to match the persisted document shape
//! (`{ token, isEnabled, status, menus, autoReplies, settings }`).

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::response::ResponseSpec;

/// Telegram bot tokens look like `123456:ABC-DEF_ghi`.
const TOKEN_PATTERN: &str = r"^\d+:[A-Za-z0-9_-]+$";

/// Returns true if `token` matches the Telegram bot token shape.
pub fn is_valid_token(token: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(TOKEN_PATTERN).expect("token pattern must compile"))
        .is_match(token)
}

/// One registered Telegram bot with its full dispatch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotConfig {
    /// Opaque identifier, assigned at creation, immutable.
    pub id: String,
    pub name: String,
    /// Telegram bot token; unique across bots.
    pub token: String,
    /// Disabled bots reject all inbound processing.
    pub is_enabled: bool,
    pub status: BotStatus,
    /// Menu commands, in listing order.
    #[serde(default)]
    pub menus: Vec<MenuItem>,
    /// Auto-reply rules, in declaration order (ties on priority resolve to the earliest).
    #[serde(default)]
    pub auto_replies: Vec<AutoReplyRule>,
    #[serde(default)]
    pub settings: BotSettings,
    pub created_at: DateTime<Utc>,
}

impl BotConfig {
    /// Creates an enabled, active bot with a generated id and empty configuration.
    pub fn new(name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            token: token.into(),
            is_enabled: true,
            status: BotStatus::Active,
            menus: Vec::new(),
            auto_replies: Vec::new(),
            settings: BotSettings::default(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotStatus {
    Active,
    Inactive,
}

/// Per-bot settings relevant to dispatch; `webhook_url` is set once webhook
/// registration succeeds and cleared on deregistration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
}

/// A bot command entry. `command` starts with `/` and is compared
/// case-insensitively at match time; `order` affects menu listing only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub text: String,
    pub command: String,
    pub order: i32,
    /// Absent response means the command is listed but produces no reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    Keyword,
    Regex,
}

/// A non-command trigger. Keyword triggers are substring matches
/// (case-sensitive); regex triggers are compiled pattern tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoReplyRule {
    /// Unique within a bot; management-facing only.
    pub name: String,
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    pub triggers: Vec<String>,
    pub is_enabled: bool,
    /// Higher value wins on conflict; ties break by declaration order.
    pub priority: i32,
    pub response: ResponseSpec,
}
