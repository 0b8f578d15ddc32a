//! Decryption of binary attachments (images) downloaded from the platform.
//!
//! Attachments are encrypted with the same encoding key as callbacks. The IV
//! is the first 16 bytes of the decoded key and the padding block is 32.

use super::material::AesKey;
use super::{cipher, padding};
use crate::error::CryptoError;

/// Decrypt `ciphertext` with a base64 encoding key.
pub fn decrypt_attachment(ciphertext: &[u8], encoding_key: &str) -> Result<Vec<u8>, CryptoError> {
    let key = AesKey::from_base64(encoding_key)?;
    decrypt_attachment_with_key(ciphertext, &key)
}

/// Same as [`decrypt_attachment`] with an already decoded key.
pub fn decrypt_attachment_with_key(ciphertext: &[u8], key: &AesKey) -> Result<Vec<u8>, CryptoError> {
    let mut buf = ciphertext.to_vec();
    cipher::decrypt_in_place(key, &mut buf)?;
    let plain_len = padding::unpad(&buf)?.len();
    buf.truncate(plain_len);
    Ok(buf)
}
