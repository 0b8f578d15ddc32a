use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use rand::Rng;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;

pub const KEY_LEN: usize = 32;
pub const IV_LEN: usize = 16;

/// Platform keys are generated as 43 random characters, so the final symbol
/// usually carries non-zero trailing bits.
const PERMISSIVE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A 256-bit AES key. The first 16 bytes double as the CBC IV.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AesKey([u8; KEY_LEN]);

impl AesKey {
    /// Decode a platform encoding key.
    ///
    /// The platform hands out 43-character keys; `=` is appended up to the
    /// next multiple of four before decoding.
    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        let padded = pad_base64(encoded.trim());
        let mut raw = PERMISSIVE
            .decode(padded.as_bytes())
            .map_err(|e| CryptoError::InvalidKey(format!("not base64: {e}")))?;
        if raw.len() != KEY_LEN {
            let len = raw.len();
            raw.zeroize();
            return Err(CryptoError::InvalidKey(format!(
                "decoded key is {len} bytes, expected {KEY_LEN}"
            )));
        }
        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(&raw);
        raw.zeroize();
        Ok(Self(key))
    }

    /// Fresh key from the thread-local CSPRNG.
    pub fn generate() -> Self {
        let mut key = [0u8; KEY_LEN];
        rand::rng().fill(&mut key);
        Self(key)
    }

    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    pub fn iv(&self) -> &[u8] {
        &self.0[..IV_LEN]
    }

    /// Encode as the 43-character form the platform console shows.
    pub fn to_encoding_key(&self) -> String {
        BASE64_STANDARD
            .encode(self.0)
            .trim_end_matches('=')
            .to_string()
    }
}

impl std::fmt::Debug for AesKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AesKey([REDACTED])")
    }
}

fn pad_base64(encoded: &str) -> String {
    let missing = (4 - encoded.len() % 4) % 4;
    let mut padded = String::with_capacity(encoded.len() + missing);
    padded.push_str(encoded);
    padded.extend(std::iter::repeat_n('=', missing));
    padded
}

/// Process-wide, read-only credentials for one bot integration.
#[derive(Clone)]
pub struct CryptoMaterial {
    token: String,
    key: AesKey,
    recipient_id: String,
}

impl CryptoMaterial {
    pub fn new(
        token: impl Into<String>,
        encoding_key: &str,
        recipient_id: impl Into<String>,
    ) -> Result<Self, CryptoError> {
        Ok(Self {
            token: token.into(),
            key: AesKey::from_base64(encoding_key)?,
            recipient_id: recipient_id.into(),
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn key(&self) -> &AesKey {
        &self.key
    }

    /// Empty for an unscoped integration identity.
    pub fn recipient_id(&self) -> &str {
        &self.recipient_id
    }

    /// Same credentials bound to another recipient.
    pub fn with_recipient(&self, recipient_id: impl Into<String>) -> Self {
        Self {
            token: self.token.clone(),
            key: self.key.clone(),
            recipient_id: recipient_id.into(),
        }
    }
}

impl std::fmt::Debug for CryptoMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoMaterial")
            .field("recipient_id", &self.recipient_id)
            .finish_non_exhaustive()
    }
}
