//! PKCS#7-style block padding over the platform's 32-byte block.
//!
//! The platform pads to the key length (32), not the AES block size (16).
//! Every padded buffer is therefore also a whole number of AES blocks.

use crate::error::CryptoError;

pub const BLOCK_SIZE: usize = 32;

/// Append padding so the length becomes the next multiple of [`BLOCK_SIZE`].
/// A buffer that is already aligned gains a full block.
pub fn pad(buf: &mut Vec<u8>) {
    let pad_len = BLOCK_SIZE - buf.len() % BLOCK_SIZE;
    #[allow(clippy::cast_possible_truncation)]
    buf.resize(buf.len() + pad_len, pad_len as u8);
}

/// Length of `len` bytes once padded.
pub fn padded_len(len: usize) -> usize {
    (len / BLOCK_SIZE + 1) * BLOCK_SIZE
}

/// Strip padding, validating the trailing length byte and the pad run.
pub fn unpad(buf: &[u8]) -> Result<&[u8], CryptoError> {
    let Some(&last) = buf.last() else {
        return Err(CryptoError::Padding { pad_len: 0 });
    };
    let pad_len = usize::from(last);
    if pad_len == 0 || pad_len > BLOCK_SIZE || pad_len > buf.len() {
        return Err(CryptoError::Padding { pad_len });
    }
    let (body, run) = buf.split_at(buf.len() - pad_len);
    if run.iter().any(|&b| b != last) {
        return Err(CryptoError::Padding { pad_len });
    }
    Ok(body)
}
