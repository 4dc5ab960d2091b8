//! Response rendering: a matched [`ResponseSpec`] becomes concrete Bot API
//! send requests.
//!
//! Pure; no network I/O. The gateway executes whatever comes out of
//! [`render`]. Output is a sequence for forward compatibility, currently
//! always of length one.

use botdesk_core::{
    Button, ButtonGrid, ButtonType, KeyboardLayout, MediaKind, ParseMode, ResolvedBody,
    ResolvedResponse, ResponseSpec,
};
use serde::Serialize;

/// `sendMessage` body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendMessageBody {
    pub chat_id: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<ReplyMarkup>,
}

/// `sendPhoto` / `sendVideo` / `sendDocument` body; the media field name
/// matches the method (`photo`, `video`, `document`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendMediaBody {
    pub chat_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<ReplyMarkup>,
}

/// One outbound send, tagged with the Bot API method it targets.
#[derive(Debug, Clone, PartialEq)]
pub enum SendRequest {
    Message(SendMessageBody),
    Photo(SendMediaBody),
    Video(SendMediaBody),
    Document(SendMediaBody),
}

impl SendRequest {
    /// Bot API method name, bit-exact.
    pub fn method(&self) -> &'static str {
        match self {
            SendRequest::Message(_) => "sendMessage",
            SendRequest::Photo(_) => "sendPhoto",
            SendRequest::Video(_) => "sendVideo",
            SendRequest::Document(_) => "sendDocument",
        }
    }

    /// JSON body for the HTTP call.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            SendRequest::Message(body) => serde_json::json!(body),
            SendRequest::Photo(body)
            | SendRequest::Video(body)
            | SendRequest::Document(body) => serde_json::json!(body),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyboardButton {
    pub text: String,
}

/// `reply_markup` payload: inline keyboard or reply keyboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReplyMarkup {
    Inline {
        inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
    },
    Reply {
        keyboard: Vec<Vec<KeyboardButton>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        resize_keyboard: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        one_time_keyboard: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        selective: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        input_field_placeholder: Option<String>,
    },
}

fn inline_button(button: &Button) -> InlineKeyboardButton {
    match button.button_type {
        ButtonType::Url => InlineKeyboardButton {
            text: button.text.clone(),
            url: Some(button.value.clone()),
            callback_data: None,
        },
        ButtonType::Callback => InlineKeyboardButton {
            text: button.text.clone(),
            url: None,
            callback_data: Some(button.value.clone()),
        },
    }
}

fn inline_rows(grid: &ButtonGrid) -> Vec<Vec<InlineKeyboardButton>> {
    grid.buttons
        .iter()
        .map(|row| row.iter().map(inline_button).collect())
        .collect()
}

/// Reply keyboards carry labels only; the url/callback distinction is
/// meaningless there.
fn reply_rows(grid: &ButtonGrid) -> Vec<Vec<KeyboardButton>> {
    grid.buttons
        .iter()
        .map(|row| {
            row.iter()
                .map(|b| KeyboardButton {
                    text: b.text.clone(),
                })
                .collect()
        })
        .collect()
}

fn markup(layout: &KeyboardLayout) -> ReplyMarkup {
    match layout {
        KeyboardLayout::Inline(grid) => ReplyMarkup::Inline {
            inline_keyboard: inline_rows(grid),
        },
        KeyboardLayout::Reply {
            grid,
            resize,
            one_time,
            selective,
            input_placeholder,
        } => ReplyMarkup::Reply {
            keyboard: reply_rows(grid),
            resize_keyboard: *resize,
            one_time_keyboard: *one_time,
            selective: *selective,
            input_field_placeholder: input_placeholder.clone(),
        },
    }
}

/// Renders a response spec into the send requests for `chat_id`.
pub fn render(spec: &ResponseSpec, chat_id: i64) -> Vec<SendRequest> {
    let resolved = ResolvedResponse::from_spec(spec);
    let reply_markup = resolved.keyboard.as_ref().map(markup);

    let request = match resolved.body {
        ResolvedBody::Text { body, parse_mode } => SendRequest::Message(SendMessageBody {
            chat_id,
            text: body,
            parse_mode,
            reply_markup,
        }),
        ResolvedBody::Media {
            kind,
            url,
            caption,
            parse_mode,
        } => {
            let mut body = SendMediaBody {
                chat_id,
                photo: None,
                video: None,
                document: None,
                caption,
                parse_mode,
                reply_markup,
            };
            match kind {
                MediaKind::Photo => {
                    body.photo = Some(url);
                    SendRequest::Photo(body)
                }
                MediaKind::Video => {
                    body.video = Some(url);
                    SendRequest::Video(body)
                }
                MediaKind::Document => {
                    body.document = Some(url);
                    SendRequest::Document(body)
                }
            }
        }
    };

    vec![request]
}
