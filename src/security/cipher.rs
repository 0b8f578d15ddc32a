use aes::Aes256;
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use super::material::AesKey;
use super::padding::BLOCK_SIZE;
use crate::error::CryptoError;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// AES-256-CBC over an already padded buffer, IV = first half of the key.
///
/// Buffers are whole padding blocks (32 bytes), not just whole AES blocks.
pub fn encrypt_in_place(key: &AesKey, buf: &mut [u8]) -> Result<(), CryptoError> {
    let len = buf.len();
    if len % BLOCK_SIZE != 0 {
        return Err(CryptoError::MalformedCiphertext { len });
    }
    Aes256CbcEnc::new_from_slices(key.as_bytes(), key.iv())
        .map_err(|e| CryptoError::InvalidKey(e.to_string()))?
        .encrypt_padded_mut::<NoPadding>(buf, len)
        .map_err(|_| CryptoError::MalformedCiphertext { len })?;
    Ok(())
}

/// Inverse of [`encrypt_in_place`]. Padding is left for the caller to strip.
pub fn decrypt_in_place(key: &AesKey, buf: &mut [u8]) -> Result<(), CryptoError> {
    let len = buf.len();
    if len == 0 || len % BLOCK_SIZE != 0 {
        return Err(CryptoError::MalformedCiphertext { len });
    }
    Aes256CbcDec::new_from_slices(key.as_bytes(), key.iv())
        .map_err(|e| CryptoError::InvalidKey(e.to_string()))?
        .decrypt_padded_mut::<NoPadding>(buf)
        .map_err(|_| CryptoError::MalformedCiphertext { len })?;
    Ok(())
}
