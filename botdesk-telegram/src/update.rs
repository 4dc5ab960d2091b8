//! Inbound Telegram update payload (the subset the dispatcher reads).
//!
//! All fields are optional-by-default so partially formed payloads still
//! deserialize; the controller decides what is usable.

use serde::Deserialize;

/// One Telegram update: a message, a callback query, or neither.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Update {
    #[serde(default)]
    pub update_id: Option<i64>,
    #[serde(default)]
    pub message: Option<IncomingMessage>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub chat: ChatRef,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub from: Option<UserRef>,
    #[serde(default)]
    pub entities: Vec<MessageEntity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRef {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserRef {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
}

/// Message entity; offsets/lengths are in characters of the message text.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageEntity {
    #[serde(rename = "type")]
    pub kind: String,
    pub offset: usize,
    pub length: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub message: Option<Box<IncomingMessage>>,
}

impl Update {
    /// Chat id from `message.chat.id` or `callback_query.message.chat.id`.
    pub fn chat_id(&self) -> Option<i64> {
        if let Some(msg) = &self.message {
            return Some(msg.chat.id);
        }
        self.callback_query
            .as_ref()
            .and_then(|cq| cq.message.as_ref())
            .map(|msg| msg.chat.id)
    }

    /// Dispatchable text: `message.text`, else `callback_query.data`.
    pub fn text(&self) -> Option<&str> {
        if let Some(text) = self.message.as_ref().and_then(|m| m.text.as_deref()) {
            return Some(text);
        }
        self.callback_query.as_ref().and_then(|cq| cq.data.as_deref())
    }

    /// Identifying hint for the global webhook route.
    ///
    /// Looks for a `bot_command` entity whose slice carries an `@mention`
    /// suffix (e.g. `/start@MyBot`), else a `:`-delimited prefix in the
    /// callback data (`<hint>:<payload>`). The hint is looked up as a store
    /// token by the caller.
    pub fn bot_hint(&self) -> Option<String> {
        if let Some(msg) = &self.message {
            if let Some(text) = &msg.text {
                for entity in &msg.entities {
                    if entity.kind != "bot_command" {
                        continue;
                    }
                    let slice: String = text
                        .chars()
                        .skip(entity.offset)
                        .take(entity.length)
                        .collect();
                    if let Some((_, mention)) = slice.split_once('@') {
                        // An oversized entity length from a client can drag
                        // trailing text into the slice; keep only the mention.
                        let mention = mention.split_whitespace().next().unwrap_or("");
                        if !mention.is_empty() {
                            return Some(mention.to_string());
                        }
                    }
                }
            }
        }

        let data = self.callback_query.as_ref()?.data.as_deref()?;
        match data.split_once(':') {
            Some((prefix, _)) if !prefix.is_empty() => Some(prefix.to_string()),
            _ => None,
        }
    }
}
