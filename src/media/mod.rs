pub mod fetch;

pub use fetch::{AttachmentFetcher, HttpAttachmentFetcher};

use crate::error::GatewayError;
use crate::security::{AesKey, decrypt_attachment_with_key};

/// Download an encrypted attachment and decrypt it with the bot key.
pub async fn load_encrypted_attachment(
    fetcher: &dyn AttachmentFetcher,
    url: &str,
    key: &AesKey,
) -> Result<Vec<u8>, GatewayError> {
    let ciphertext = fetcher.fetch(url).await?;
    tracing::info!(bytes = ciphertext.len(), "attachment downloaded");
    let plain = decrypt_attachment_with_key(&ciphertext, key)?;
    tracing::info!(bytes = plain.len(), "attachment decrypted");
    Ok(plain)
}
