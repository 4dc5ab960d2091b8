//! Response specification and its resolved form.
//!
//! A stored [`ResponseSpec`] carries a loose `types` list (the document shape
//! allows conflicting combinations). [`ResolvedResponse::from_spec`] collapses
//! it once into a single concrete variant using a fixed precedence list, so
//! the renderer never re-derives behavior from the flat list. Specs that
//! skipped upstream validation degrade to the first recognized type.

use serde::{Deserialize, Serialize};

/// The response kinds a spec may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    Text,
    Markdown,
    Html,
    Photo,
    Video,
    Document,
    InlineButtons,
    Keyboard,
}

/// Telegram `parse_mode` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseMode {
    Markdown,
    #[serde(rename = "HTML")]
    Html,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonType {
    Url,
    Callback,
}

/// One keyboard button: a label plus either a URL or callback data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub text: String,
    #[serde(rename = "type")]
    pub button_type: ButtonType,
    pub value: String,
}

/// 2-D button layout; rows of buttons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonGrid {
    pub buttons: Vec<Vec<Button>>,
}

/// Stored response content, as configured through the management surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSpec {
    /// Non-empty set of declared kinds; resolved by precedence at dispatch.
    pub types: Vec<ResponseType>,
    /// Text body; required for the text family.
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buttons: Option<ButtonGrid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resize_keyboard: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_time_keyboard: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selective: Option<bool>,
}

impl ResponseSpec {
    /// Minimal plain-text spec; handy for tests and seed data.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            types: vec![ResponseType::Text],
            content: content.into(),
            media_url: None,
            caption: None,
            buttons: None,
            input_placeholder: None,
            resize_keyboard: None,
            one_time_keyboard: None,
            selective: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
    Document,
}

/// The single concrete body a spec resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedBody {
    Text {
        body: String,
        parse_mode: Option<ParseMode>,
    },
    Media {
        kind: MediaKind,
        url: String,
        caption: Option<String>,
        parse_mode: Option<ParseMode>,
    },
}

/// How the configured button grid is to be presented.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyboardLayout {
    Inline(ButtonGrid),
    Reply {
        grid: ButtonGrid,
        resize: Option<bool>,
        one_time: Option<bool>,
        selective: Option<bool>,
        input_placeholder: Option<String>,
    },
}

/// A spec collapsed to one body plus an optional keyboard.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedResponse {
    pub body: ResolvedBody,
    pub keyboard: Option<KeyboardLayout>,
}

/// Body precedence: text family first, then media kinds. The first declared
/// type found here wins; everything after it is ignored.
const BODY_PRECEDENCE: [ResponseType; 6] = [
    ResponseType::Text,
    ResponseType::Markdown,
    ResponseType::Html,
    ResponseType::Photo,
    ResponseType::Video,
    ResponseType::Document,
];

impl ResolvedResponse {
    /// Collapses `spec.types` into one concrete variant.
    ///
    /// `parse_mode` derives from the declared types (markdown wins over html
    /// when both are present) and applies to the text body or media caption.
    /// A media type without a `media_url` falls back to a text body so a
    /// misconfigured spec still produces a sendable message.
    pub fn from_spec(spec: &ResponseSpec) -> Self {
        let parse_mode = if spec.types.contains(&ResponseType::Markdown) {
            Some(ParseMode::Markdown)
        } else if spec.types.contains(&ResponseType::Html) {
            Some(ParseMode::Html)
        } else {
            None
        };

        let first = BODY_PRECEDENCE
            .iter()
            .find(|t| spec.types.contains(t))
            .copied();

        let body = match first {
            Some(ResponseType::Photo) | Some(ResponseType::Video) | Some(ResponseType::Document)
                if spec.media_url.is_some() =>
            {
                let kind = match first {
                    Some(ResponseType::Photo) => MediaKind::Photo,
                    Some(ResponseType::Video) => MediaKind::Video,
                    _ => MediaKind::Document,
                };
                ResolvedBody::Media {
                    kind,
                    url: spec.media_url.clone().unwrap_or_default(),
                    caption: spec.caption.clone(),
                    parse_mode,
                }
            }
            _ => ResolvedBody::Text {
                body: spec.content.clone(),
                parse_mode,
            },
        };

        let keyboard = spec.buttons.as_ref().and_then(|grid| {
            if spec.types.contains(&ResponseType::InlineButtons) {
                Some(KeyboardLayout::Inline(grid.clone()))
            } else if spec.types.contains(&ResponseType::Keyboard) {
                Some(KeyboardLayout::Reply {
                    grid: grid.clone(),
                    resize: spec.resize_keyboard,
                    one_time: spec.one_time_keyboard,
                    selective: spec.selective,
                    input_placeholder: spec.input_placeholder.clone(),
                })
            } else {
                None
            }
        });

        Self { body, keyboard }
    }
}
