//! Message envelope codec.
//!
//! Frame layout before padding:
//!
//! ```text
//! [16 random bytes][u32 BE body length][body][recipient id]
//! ```
//!
//! The frame is padded to a 32-byte boundary, AES-256-CBC encrypted with the
//! IV taken from the first 16 key bytes, and base64 encoded.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::material::CryptoMaterial;
use super::random::TokenSource;
use super::{cipher, padding, signature};
use crate::error::CryptoError;

const NONCE_LEN: usize = 16;
const LEN_PREFIX: usize = 4;
const HEADER_LEN: usize = NONCE_LEN + LEN_PREFIX;

/// Signed ciphertext as exchanged on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyPacket {
    pub encrypt: String,
    pub msgsignature: String,
    pub timestamp: String,
    pub nonce: String,
}

/// Inbound POST body.
#[derive(Debug, Deserialize)]
struct InboundPacket {
    encrypt: String,
}

/// Pull the ciphertext out of a callback body.
///
/// Accepts the platform's `{"encrypt": "..."}` object and falls back to the
/// trimmed body for bare ciphertext.
pub fn extract_ciphertext(body: &[u8]) -> Result<String, CryptoError> {
    if let Ok(packet) = serde_json::from_slice::<InboundPacket>(body) {
        return Ok(packet.encrypt);
    }
    let text = std::str::from_utf8(body)
        .map_err(|_| CryptoError::Decoding("body is not utf-8".into()))?
        .trim();
    if text.is_empty() {
        return Err(CryptoError::Decoding("empty body".into()));
    }
    Ok(text.to_string())
}

pub struct EnvelopeCodec {
    material: Arc<CryptoMaterial>,
    random: Arc<dyn TokenSource>,
}

impl EnvelopeCodec {
    pub fn new(material: Arc<CryptoMaterial>, random: Arc<dyn TokenSource>) -> Self {
        Self { material, random }
    }

    pub fn material(&self) -> &CryptoMaterial {
        &self.material
    }

    /// Frame, pad, encrypt and base64 encode `plaintext` for `recipient_id`.
    pub fn encrypt(&self, plaintext: &str, recipient_id: &str) -> Result<String, CryptoError> {
        let body = plaintext.as_bytes();
        let body_len = u32::try_from(body.len())
            .map_err(|_| CryptoError::Framing("message longer than u32::MAX"))?;

        let nonce = self.random.next_token(NONCE_LEN);
        let mut frame = Vec::with_capacity(padding::padded_len(
            HEADER_LEN + body.len() + recipient_id.len(),
        ));
        frame.extend_from_slice(&nonce.as_bytes()[..NONCE_LEN.min(nonce.len())]);
        frame.resize(NONCE_LEN, b'0');
        frame.extend_from_slice(&body_len.to_be_bytes());
        frame.extend_from_slice(body);
        frame.extend_from_slice(recipient_id.as_bytes());
        padding::pad(&mut frame);

        cipher::encrypt_in_place(self.material.key(), &mut frame)?;
        Ok(BASE64_STANDARD.encode(&frame))
    }

    /// Reverse of [`encrypt`](Self::encrypt), bound to the configured recipient.
    pub fn decrypt(&self, ciphertext: &str) -> Result<String, CryptoError> {
        let mut buf = BASE64_STANDARD
            .decode(ciphertext.trim().as_bytes())
            .map_err(|e| CryptoError::Decoding(e.to_string()))?;
        cipher::decrypt_in_place(self.material.key(), &mut buf)?;
        let frame = padding::unpad(&buf)?;

        if frame.len() < HEADER_LEN {
            return Err(CryptoError::Framing("frame shorter than header"));
        }
        let mut len_bytes = [0u8; LEN_PREFIX];
        len_bytes.copy_from_slice(&frame[NONCE_LEN..HEADER_LEN]);
        let body_len = u32::from_be_bytes(len_bytes) as usize;
        let body_end = HEADER_LEN
            .checked_add(body_len)
            .filter(|end| *end <= frame.len())
            .ok_or(CryptoError::Framing("length prefix exceeds frame"))?;

        let recipient = &frame[body_end..];
        if recipient != self.material.recipient_id().as_bytes() {
            return Err(CryptoError::RecipientMismatch);
        }

        String::from_utf8(frame[HEADER_LEN..body_end].to_vec())
            .map_err(|_| CryptoError::Framing("message is not utf-8"))
    }

    /// Check the signature over `ciphertext`, then decrypt it.
    pub fn open(
        &self,
        msg_signature: &str,
        timestamp: &str,
        nonce: &str,
        ciphertext: &str,
    ) -> Result<String, CryptoError> {
        signature::ensure_valid(
            self.material.token(),
            timestamp,
            nonce,
            ciphertext,
            msg_signature,
        )?;
        self.decrypt(ciphertext)
    }

    /// Encrypt for the configured recipient and sign the result.
    pub fn seal(
        &self,
        plaintext: &str,
        timestamp: &str,
        nonce: &str,
    ) -> Result<ReplyPacket, CryptoError> {
        let encrypt = self.encrypt(plaintext, self.material.recipient_id())?;
        let msgsignature = signature::sign(self.material.token(), timestamp, nonce, &encrypt);
        Ok(ReplyPacket {
            encrypt,
            msgsignature,
            timestamp: timestamp.to_string(),
            nonce: nonce.to_string(),
        })
    }
}
