use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `streamgate`.
///
/// Each subsystem defines its own error variant. The gateway matches on these
/// to decide between an HTTP rejection and a conversational answer; the
/// composition root continues to use `anyhow::Result` for context chains.
#[derive(Debug, Error)]
pub enum GatewayError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Signature / envelope ────────────────────────────────────────────
    #[error("crypto: {0}")]
    Crypto(#[from] CryptoError),

    // ── Inbound message parsing ─────────────────────────────────────────
    #[error("message: {0}")]
    Message(#[from] MessageError),

    // ── Task engine ─────────────────────────────────────────────────────
    #[error("task: {0}")]
    Task(#[from] TaskError),

    // ── Attachment fetch ────────────────────────────────────────────────
    #[error("fetch: {0}")]
    Fetch(#[from] FetchError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Crypto errors ───────────────────────────────────────────────────────────

/// Text shown to the remote platform for every envelope integrity failure.
pub const DECRYPTION_FAILED: &str = "decryption failed";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("signature mismatch")]
    Authentication,

    #[error("invalid base64: {0}")]
    Decoding(String),

    #[error("ciphertext length {len} is not a multiple of the block size")]
    MalformedCiphertext { len: usize },

    #[error("invalid padding length {pad_len}")]
    Padding { pad_len: usize },

    #[error("recipient id mismatch")]
    RecipientMismatch,

    #[error("frame truncated: {0}")]
    Framing(&'static str),

    #[error("invalid key: {0}")]
    InvalidKey(String),
}

impl CryptoError {
    /// True for the failures that mean "this envelope cannot be trusted",
    /// as opposed to a bad signature or a misconfigured key.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(
            self,
            Self::Decoding(_)
                | Self::MalformedCiphertext { .. }
                | Self::Padding { .. }
                | Self::RecipientMismatch
                | Self::Framing(_)
        )
    }

    /// Externally visible text. Never reveals which decryption stage failed.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Authentication => "signature verification failed",
            Self::InvalidKey(_) => "server misconfigured",
            _ => DECRYPTION_FAILED,
        }
    }
}

// ─── Message errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("invalid message json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("message of type {msgtype} has no `{msgtype}` payload")]
    MissingPayload { msgtype: &'static str },

    #[error("unsupported message type: {0}")]
    UnsupportedType(String),
}

// ─── Task errors ─────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("task {0} not found or expired")]
    NotFound(String),

    #[error("no free task id after {attempts} attempts")]
    IdSpaceExhausted { attempts: u32 },

    #[error("store: {0}")]
    Store(String),
}

impl From<sqlx::Error> for TaskError {
    fn from(err: sqlx::Error) -> Self {
        Self::Store(err.to_string())
    }
}

// ─── Fetch errors ────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network: {0}")]
    Network(String),

    #[error("timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("upstream returned HTTP {0}")]
    Status(u16),

    #[error("attachment exceeds {limit} bytes")]
    TooLarge { limit: usize },
}
