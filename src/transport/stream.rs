//! Outbound `stream` messages.
//!
//! ```json
//! {"msgtype":"stream","stream":{"id":"..","finish":false,"content":".."}}
//! {"msgtype":"stream","stream":{"id":"..","finish":true,
//!   "msg_item":[{"msgtype":"image","image":{"base64":"..","md5":".."}}]}}
//! ```

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

/// One chunk of a streamed answer. `finish` marks the terminal chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamEnvelope {
    pub id: String,
    pub finish: bool,
    #[serde(flatten)]
    pub body: StreamBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StreamBody {
    Content { content: String },
    Items { msg_item: Vec<MessageItem> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "msgtype", rename_all = "lowercase")]
pub enum MessageItem {
    Text { text: TextItem },
    Image { image: ImageItem },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextItem {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageItem {
    pub base64: String,
    /// Lowercase hex MD5 of the raw image bytes, not of `base64`.
    pub md5: String,
}

impl MessageItem {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            text: TextItem {
                content: content.into(),
            },
        }
    }

    pub fn image(raw: &[u8]) -> Self {
        Self::Image {
            image: ImageItem {
                base64: BASE64_STANDARD.encode(raw),
                md5: hex::encode(Md5::digest(raw)),
            },
        }
    }
}

#[derive(Serialize)]
struct WireMessage<'a> {
    msgtype: &'static str,
    stream: &'a StreamEnvelope,
}

impl StreamEnvelope {
    pub fn text(id: impl Into<String>, content: impl Into<String>, finish: bool) -> Self {
        Self {
            id: id.into(),
            finish,
            body: StreamBody::Content {
                content: content.into(),
            },
        }
    }

    pub fn image(id: impl Into<String>, raw: &[u8], finish: bool) -> Self {
        Self::items(id, vec![MessageItem::image(raw)], finish)
    }

    pub fn items(id: impl Into<String>, items: Vec<MessageItem>, finish: bool) -> Self {
        Self {
            id: id.into(),
            finish,
            body: StreamBody::Items { msg_item: items },
        }
    }

    /// Serialize wrapped in the `{"msgtype":"stream"}` message.
    pub fn to_wire_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&WireMessage {
            msgtype: "stream",
            stream: self,
        })
    }
}
