pub mod attachment;
mod cipher;
pub mod envelope;
pub mod material;
pub mod padding;
pub mod random;
pub mod signature;

pub use attachment::{decrypt_attachment, decrypt_attachment_with_key};
pub use envelope::{EnvelopeCodec, ReplyPacket, extract_ciphertext};
pub use material::{AesKey, CryptoMaterial};
#[cfg(test)]
pub use random::ScriptedTokenSource;
pub use random::{ThreadRngTokenSource, TokenSource};
