//! Decrypted callback messages.

use serde::Deserialize;

use crate::error::MessageError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Sender {
    #[serde(default)]
    pub userid: String,
}

/// A decrypted callback with its routing metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub msgid: Option<String>,
    pub aibotid: Option<String>,
    pub chatid: Option<String>,
    pub chattype: Option<String>,
    pub from: Sender,
    pub response_url: Option<String>,
    pub body: MessageBody,
}

/// Every message kind the platform delivers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    Text { content: String },
    /// Poll for the next chunk of stream `id`.
    Stream { id: String },
    Image { url: String },
    Mixed { items: Vec<serde_json::Value> },
    Event { event_type: String },
    /// Any other `msgtype`; empty when the field is missing.
    Unknown { msgtype: String },
}

impl MessageBody {
    pub fn kind(&self) -> &str {
        match self {
            Self::Text { .. } => "text",
            Self::Stream { .. } => "stream",
            Self::Image { .. } => "image",
            Self::Mixed { .. } => "mixed",
            Self::Event { .. } => "event",
            Self::Unknown { msgtype } => msgtype,
        }
    }
}

#[derive(Deserialize)]
struct RawMessage {
    msgid: Option<String>,
    aibotid: Option<String>,
    chatid: Option<String>,
    chattype: Option<String>,
    #[serde(default)]
    from: Sender,
    response_url: Option<String>,
    msgtype: Option<String>,
    text: Option<TextPayload>,
    stream: Option<StreamPayload>,
    image: Option<ImagePayload>,
    mixed: Option<MixedPayload>,
    event: Option<EventPayload>,
}

#[derive(Deserialize)]
struct TextPayload {
    content: String,
}

#[derive(Deserialize)]
struct StreamPayload {
    id: String,
}

#[derive(Deserialize)]
struct ImagePayload {
    url: String,
}

#[derive(Deserialize)]
struct MixedPayload {
    #[serde(default)]
    msg_item: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct EventPayload {
    #[serde(default)]
    eventtype: String,
}

impl InboundMessage {
    pub fn parse(json: &str) -> Result<Self, MessageError> {
        let raw: RawMessage = serde_json::from_str(json)?;
        let body = match raw.msgtype.as_deref() {
            Some("text") => MessageBody::Text {
                content: raw
                    .text
                    .ok_or(MessageError::MissingPayload { msgtype: "text" })?
                    .content,
            },
            Some("stream") => MessageBody::Stream {
                id: raw
                    .stream
                    .ok_or(MessageError::MissingPayload { msgtype: "stream" })?
                    .id,
            },
            Some("image") => MessageBody::Image {
                url: raw
                    .image
                    .ok_or(MessageError::MissingPayload { msgtype: "image" })?
                    .url,
            },
            Some("mixed") => MessageBody::Mixed {
                items: raw
                    .mixed
                    .ok_or(MessageError::MissingPayload { msgtype: "mixed" })?
                    .msg_item,
            },
            Some("event") => MessageBody::Event {
                event_type: raw.event.map(|e| e.eventtype).unwrap_or_default(),
            },
            other => MessageBody::Unknown {
                msgtype: other.unwrap_or_default().to_string(),
            },
        };
        Ok(Self {
            msgid: raw.msgid,
            aibotid: raw.aibotid,
            chatid: raw.chatid,
            chattype: raw.chattype,
            from: raw.from,
            response_url: raw.response_url,
            body,
        })
    }
}
