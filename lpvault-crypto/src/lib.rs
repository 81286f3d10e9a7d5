//! Cipher primitives and key derivation for LastPass vaults.
//!
//! Everything a vault decoder needs to turn ciphertext items back into
//! plaintext:
//!
//! - AES-256 in the current `!iv|ciphertext` CBC format, with a legacy
//!   ECB fallback for entries written by old clients
//! - RSA-OAEP for sharing-related payloads, plus recovery of the vault's
//!   own RSA private key (stored AES-ECB-encrypted under the vault key)
//! - The two-stage PBKDF2-HMAC-SHA256 scheme that produces the
//!   server-facing login key and the local decryption key
//! - SHA-256 digests and the hex/base64 codecs the wire formats use
//!
//! # Key hygiene
//!
//! Intermediate key material is wrapped in [`zeroize::Zeroizing`] so it is
//! cleared when dropped. This is hygiene, not a guarantee: the derived
//! keys handed to callers live as long as the caller keeps them.

mod cipher;
mod error;
mod kdf;

pub use cipher::{
    aes_decrypt, aes_decrypt_base64, aes_encrypt, decrypt_private_key, encrypt_and_base64,
    hex_to_bytes, rsa_decrypt, rsa_encrypt, sha256_base64, sha256_hex, AES_BLOCK_SIZE,
    AES_KEY_SIZE,
};
pub use error::{CryptoError, CryptoResult};
pub use kdf::{decryption_key, derive_keys, login_key, MIN_ITERATIONS};
