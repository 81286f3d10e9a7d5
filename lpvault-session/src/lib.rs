//! Encrypted session record codec.
//!
//! A session holds the identifiers and tokens a client needs to reuse
//! an authenticated server connection. The persisted artifact is one
//! blob: the session serialized as JSON, AES-encrypted with the vault
//! master key, base64-wrapped. File I/O belongs to the caller; the
//! recommended on-disk layout is a user-only directory (`0700`) holding
//! a user-only file (`0600`).
//!
//! Loading degrades rather than fails: wrong key, corrupted payload or
//! malformed JSON all decode to `None`, so a caller can always fall
//! back to a fresh login.

use lpvault_crypto::{aes_decrypt_base64, encrypt_and_base64, AES_KEY_SIZE};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_SERVER: &str = "lastpass.com";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Authentication state for one logged-in account.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub sessionid: String,
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_server")]
    pub server: String,
    /// RSA private key PEM recovered from the login response, empty
    /// when the account has none.
    #[serde(default)]
    pub private_key: String,
}

fn default_server() -> String {
    DEFAULT_SERVER.to_owned()
}

impl Default for Session {
    fn default() -> Self {
        Self {
            uid: String::new(),
            sessionid: String::new(),
            token: String::new(),
            server: default_server(),
            private_key: String::new(),
        }
    }
}

impl Session {
    /// True when the session carries everything needed to talk to the
    /// server without logging in again.
    pub fn is_valid(&self) -> bool {
        !self.uid.is_empty() && !self.sessionid.is_empty() && !self.token.is_empty()
    }

    /// Serializes and encrypts the session for persistence.
    pub fn encode(&self, key: &[u8; AES_KEY_SIZE]) -> Result<String, SessionError> {
        let json = serde_json::to_string(self)?;
        Ok(encrypt_and_base64(&json, key))
    }

    /// Decrypts and deserializes a persisted session.
    ///
    /// Every failure mode collapses to `None`: there is no session to
    /// resume, log in again.
    pub fn decode(encoded: &str, key: &[u8; AES_KEY_SIZE]) -> Option<Session> {
        let json = match aes_decrypt_base64(encoded.trim(), key) {
            Ok(json) => json,
            Err(err) => {
                debug!(%err, "session decryption failed");
                return None;
            }
        };
        serde_json::from_str(&json).ok()
    }
}
