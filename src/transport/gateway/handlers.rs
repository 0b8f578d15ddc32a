use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use super::dispatch::{Reply, dispatch};
use super::{AppState, CallbackQuery, VERIFY_FAIL, VerifyQuery};
use crate::error::CryptoError;
use crate::security::extract_ciphertext;
use crate::transport::message::InboundMessage;

/// Status and public body for a rejected envelope. Integrity failures all
/// share one body so the response never reveals which stage failed.
fn crypto_rejection(error: &CryptoError) -> (StatusCode, &'static str) {
    let status = match error {
        CryptoError::Authentication => StatusCode::UNAUTHORIZED,
        CryptoError::InvalidKey(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    };
    (status, error.public_message())
}

/// GET /health - always public (no secrets leaked)
pub(super) async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

/// GET {prefix}/{bot_id} - platform URL verification.
///
/// Always 200; the platform reads success or failure from the body.
pub(super) async fn handle_verify_url(
    State(state): State<AppState>,
    Path(bot_id): Path<String>,
    Query(params): Query<VerifyQuery>,
) -> impl IntoResponse {
    let (Some(signature), Some(timestamp), Some(nonce), Some(echostr)) = (
        params.msg_signature,
        params.timestamp,
        params.nonce,
        params.echostr,
    ) else {
        tracing::warn!(bot_id = %bot_id, "verification request missing query parameters");
        return (StatusCode::OK, VERIFY_FAIL.to_string());
    };

    match state
        .verify_codec
        .open(&signature, &timestamp, &nonce, &echostr)
    {
        Ok(plain) => {
            tracing::info!(bot_id = %bot_id, "callback URL verified");
            (StatusCode::OK, plain)
        }
        Err(error) => {
            tracing::warn!(bot_id = %bot_id, error = %error, "callback URL verification failed");
            (StatusCode::OK, VERIFY_FAIL.to_string())
        }
    }
}

/// POST {prefix}/{bot_id} - encrypted message callback.
pub(super) async fn handle_callback(
    State(state): State<AppState>,
    Path(bot_id): Path<String>,
    Query(params): Query<CallbackQuery>,
    body: Bytes,
) -> Response {
    let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());
    let (Some(signature), Some(timestamp), Some(nonce)) = (
        non_empty(params.msg_signature),
        non_empty(params.timestamp),
        non_empty(params.nonce),
    ) else {
        tracing::warn!(bot_id = %bot_id, "callback missing msg_signature, timestamp or nonce");
        return (
            StatusCode::BAD_REQUEST,
            "missing msg_signature, timestamp or nonce",
        )
            .into_response();
    };

    let opened = extract_ciphertext(&body)
        .and_then(|ciphertext| state.codec.open(&signature, &timestamp, &nonce, &ciphertext));
    let plain = match opened {
        Ok(plain) => plain,
        Err(error) => {
            if matches!(error, CryptoError::Authentication) {
                tracing::warn!(bot_id = %bot_id, "callback signature mismatch");
            } else {
                tracing::warn!(bot_id = %bot_id, error = %error, "callback envelope rejected");
            }
            return crypto_rejection(&error).into_response();
        }
    };

    let message = match InboundMessage::parse(&plain) {
        Ok(message) => message,
        Err(error) => {
            tracing::warn!(bot_id = %bot_id, error = %error, "callback message rejected");
            return (StatusCode::BAD_REQUEST, "invalid message").into_response();
        }
    };
    tracing::info!(
        bot_id = %bot_id,
        msgtype = message.body.kind(),
        msgid = message.msgid.as_deref().unwrap_or_default(),
        "callback received"
    );

    match dispatch(&state, &bot_id, &message).await {
        Reply::Ack(text) => (StatusCode::OK, text).into_response(),
        Reply::Stream(chunk) => {
            let sealed = chunk
                .to_wire_json()
                .map_err(|e| e.to_string())
                .and_then(|json| {
                    state
                        .codec
                        .seal(&json, &timestamp, &nonce)
                        .map_err(|e| e.to_string())
                })
                .and_then(|packet| serde_json::to_string(&packet).map_err(|e| e.to_string()));
            match sealed {
                Ok(reply) => (StatusCode::OK, reply).into_response(),
                Err(error) => {
                    tracing::error!(
                        bot_id = %bot_id,
                        stream_id = %chunk.id,
                        error = %error,
                        "failed to seal reply"
                    );
                    (StatusCode::INTERNAL_SERVER_ERROR, "failed to encrypt reply").into_response()
                }
            }
        }
    }
}
