//! Error types for the crypto layer.

use thiserror::Error;

/// All errors the cipher and KDF primitives can produce.
///
/// Vault decoding converts [`CryptoError::Decryption`] into an empty
/// string at each item-decode site, so a single bad field never aborts
/// a record.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("decryption failed: {0}")]
    Decryption(String),

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("invalid RSA key: {0}")]
    InvalidKey(String),

    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("iteration count must be at least 2, got {0}")]
    InvalidIterations(u32),
}

pub type CryptoResult<T> = Result<T, CryptoError>;
