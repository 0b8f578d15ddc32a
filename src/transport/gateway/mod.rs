//! Axum-based HTTP gateway for the bot callback exchange.
//!
//! - URL verification handshake (`GET {prefix}/{bot_id}`)
//! - Encrypted callbacks answered with signed stream chunks (`POST {prefix}/{bot_id}`)
//! - Request body size limits (64KB max)
//! - Request timeouts (30s) to prevent slow-loris attacks

mod dispatch;
mod handlers;
mod server;

pub use server::{build_app, build_state, is_public_bind, run_gateway, run_gateway_with_listener};

use crate::core::AnswerEngine;
use crate::media::AttachmentFetcher;
use crate::security::{EnvelopeCodec, TokenSource};
use std::sync::Arc;

/// Maximum request body size (64KB) -- prevents memory exhaustion
pub const MAX_BODY_SIZE: usize = 65_536;
/// Request timeout (30s) -- prevents slow-loris attacks
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Body returned by the verification endpoint when the handshake fails.
pub const VERIFY_FAIL: &str = "verify fail";

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    /// Codec bound to the configured recipient; seals every reply.
    pub codec: Arc<EnvelopeCodec>,
    /// Codec for the verification echo, which is always unscoped.
    pub verify_codec: Arc<EnvelopeCodec>,
    pub engine: Arc<AnswerEngine>,
    pub fetcher: Arc<dyn AttachmentFetcher>,
    /// Stream ids for answers that do not come from the task store.
    pub ids: Arc<dyn TokenSource>,
    pub id_length: usize,
}

/// Verification query params. All optional so a missing one fails the
/// handshake with the platform's expected body instead of a 400.
#[derive(Debug, Default, serde::Deserialize)]
pub struct VerifyQuery {
    pub msg_signature: Option<String>,
    pub timestamp: Option<String>,
    pub nonce: Option<String>,
    pub echostr: Option<String>,
}

/// Callback query params
#[derive(Debug, Default, serde::Deserialize)]
pub struct CallbackQuery {
    pub msg_signature: Option<String>,
    pub timestamp: Option<String>,
    pub nonce: Option<String>,
}
