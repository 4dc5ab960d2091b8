//! Rule matching: exact menu command match first, then the highest-priority
//! enabled auto-reply rule.
//!
//! Pure functions over the bot configuration; no I/O. The webhook controller
//! turns the result into outbound sends.

use botdesk_core::{AutoReplyRule, BotConfig, MenuItem, ResponseSpec, RuleType};
use regex::Regex;
use tracing::warn;

/// The single handler selected for an inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum Match<'a> {
    /// Exact menu command hit; always outranks rules. Carries the item's
    /// response so callers never see a command match without one.
    Command {
        item: &'a MenuItem,
        response: &'a ResponseSpec,
    },
    /// Best auto-reply rule hit.
    Rule(&'a AutoReplyRule),
}

impl<'a> Match<'a> {
    /// The response spec to render.
    pub fn response(&self) -> &'a ResponseSpec {
        match self {
            Match::Command { response, .. } => response,
            Match::Rule(rule) => &rule.response,
        }
    }

    /// Handler name for logging.
    pub fn name(&self) -> &str {
        match self {
            Match::Command { item, .. } => &item.command,
            Match::Rule(rule) => &rule.name,
        }
    }
}

/// Normalizes a command message for lookup: cut at the first whitespace,
/// strip any `@botname` suffix, lowercase.
fn normalize_command(text: &str) -> String {
    let head = text.split_whitespace().next().unwrap_or(text);
    let head = head.split('@').next().unwrap_or(head);
    head.to_lowercase()
}

/// Resolves the handler for `text` against the bot configuration.
///
/// A menu command with a response short-circuits rule evaluation entirely.
/// Commands without a response fall through to the auto-reply rules, as does
/// any non-command text. Among matching enabled rules the highest priority
/// wins; equal priorities resolve to the earliest-declared rule. Empty text
/// never matches.
pub fn resolve<'a>(bot: &'a BotConfig, text: &str) -> Option<Match<'a>> {
    if text.is_empty() {
        return None;
    }

    if text.starts_with('/') {
        let command = normalize_command(text);
        let hit = bot
            .menus
            .iter()
            .find(|item| item.command.to_lowercase() == command);
        if let Some(item) = hit {
            if let Some(response) = item.response.as_ref() {
                return Some(Match::Command { item, response });
            }
            // Listed command without a response: fall through to rules.
        }
    }

    let mut best: Option<&AutoReplyRule> = None;
    for rule in &bot.auto_replies {
        if !rule.is_enabled {
            continue;
        }
        if !rule_matches(bot, rule, text) {
            continue;
        }
        // Strict > keeps the earliest-declared rule on priority ties.
        if best.map_or(true, |b| rule.priority > b.priority) {
            best = Some(rule);
        }
    }
    best.map(Match::Rule)
}

fn rule_matches(bot: &BotConfig, rule: &AutoReplyRule, text: &str) -> bool {
    match rule.rule_type {
        RuleType::Keyword => rule.triggers.iter().any(|t| text.contains(t.as_str())),
        RuleType::Regex => rule.triggers.iter().any(|t| match Regex::new(t) {
            Ok(re) => re.is_match(text),
            Err(err) => {
                // A broken pattern must never take down matching.
                warn!(
                    bot_id = %bot.id,
                    rule = %rule.name,
                    pattern = %t,
                    error = %err,
                    "invalid regex trigger, treating as non-matching"
                );
                false
            }
        }),
    }
}
