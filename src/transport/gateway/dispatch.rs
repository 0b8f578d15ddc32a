//! Turns a decrypted callback into the chunk (or plain ack) sent back.

use super::AppState;
use crate::core::Answer;
use crate::error::MessageError;
use crate::media::load_encrypted_attachment;
use crate::transport::message::{InboundMessage, MessageBody};
use crate::transport::stream::StreamEnvelope;

pub(super) const IMAGE_FAILED_ANSWER: &str = "Sorry, the image could not be processed.";
pub(super) const ENGINE_FAILED_ANSWER: &str =
    "Sorry, the answer could not be generated right now.";

/// What the callback handler sends back.
#[derive(Debug)]
pub(super) enum Reply {
    /// Encrypted and signed before it leaves the gateway.
    Stream(StreamEnvelope),
    /// Plain acknowledgement; the platform expects no encrypted answer.
    Ack(&'static str),
}

fn answer_chunk(answer: Answer) -> StreamEnvelope {
    StreamEnvelope::text(answer.stream_id, answer.content, answer.finish)
}

fn fresh_stream_id(state: &AppState) -> String {
    state.ids.next_token(state.id_length)
}

pub(super) async fn dispatch(state: &AppState, bot_id: &str, message: &InboundMessage) -> Reply {
    match &message.body {
        MessageBody::Text { content } => match state.engine.start(content).await {
            Ok(answer) => Reply::Stream(answer_chunk(answer)),
            Err(error) => {
                tracing::error!(bot_id, error = %error, "failed to start task");
                Reply::Stream(StreamEnvelope::text(
                    fresh_stream_id(state),
                    ENGINE_FAILED_ANSWER,
                    true,
                ))
            }
        },
        MessageBody::Stream { id } => match state.engine.poll(id).await {
            Ok(answer) => Reply::Stream(answer_chunk(answer)),
            Err(error) => {
                tracing::error!(bot_id, stream_id = %id, error = %error, "failed to advance task");
                Reply::Stream(StreamEnvelope::text(id.as_str(), ENGINE_FAILED_ANSWER, true))
            }
        },
        MessageBody::Image { url } => {
            let stream_id = fresh_stream_id(state);
            let key = state.codec.material().key();
            match load_encrypted_attachment(state.fetcher.as_ref(), url, key).await {
                Ok(raw) => {
                    tracing::info!(bot_id, stream_id = %stream_id, bytes = raw.len(), "echoing image");
                    Reply::Stream(StreamEnvelope::image(stream_id, &raw, true))
                }
                Err(error) => {
                    tracing::warn!(bot_id, stream_id = %stream_id, error = %error, "image unavailable");
                    Reply::Stream(StreamEnvelope::text(stream_id, IMAGE_FAILED_ANSWER, true))
                }
            }
        }
        MessageBody::Mixed { items } => {
            tracing::warn!(bot_id, items = items.len(), "mixed messages are not supported yet");
            Reply::Ack("")
        }
        MessageBody::Event { event_type } => {
            tracing::warn!(bot_id, event_type = %event_type, "events are not supported yet");
            Reply::Ack("")
        }
        MessageBody::Unknown { msgtype } if msgtype.is_empty() => {
            tracing::info!(bot_id, "callback without msgtype");
            Reply::Ack("success")
        }
        MessageBody::Unknown { msgtype } => {
            let error = MessageError::UnsupportedType(msgtype.clone());
            tracing::warn!(bot_id, error = %error, "ignoring message");
            Reply::Ack("")
        }
    }
}
