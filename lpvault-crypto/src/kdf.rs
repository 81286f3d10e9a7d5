//! Two-stage PBKDF2 key derivation.
//!
//! Stage one derives the local decryption key from the password with the
//! username as salt. Stage two runs one further PBKDF2 round over stage
//! one with the password as salt and hex-encodes the result as the
//! server-facing login key. The decryption key never leaves the client.
//!
//! Username and password are used byte-for-byte; no case normalization
//! is applied.

use pbkdf2::pbkdf2_hmac_array;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::{CryptoError, CryptoResult};
use crate::AES_KEY_SIZE;

/// Iteration counts below this are a transport/auth error: the server
/// supplies the per-account count and never reports fewer than 2.
pub const MIN_ITERATIONS: u32 = 2;

/// Derives the local vault decryption key:
/// PBKDF2-HMAC-SHA256(password, salt = username, iterations, 32 bytes).
pub fn decryption_key(
    username: &str,
    password: &str,
    iterations: u32,
) -> CryptoResult<[u8; AES_KEY_SIZE]> {
    check_iterations(iterations)?;
    Ok(pbkdf2_hmac_array::<Sha256, AES_KEY_SIZE>(
        password.as_bytes(),
        username.as_bytes(),
        iterations,
    ))
}

/// Derives the hex-encoded login key sent to the server for
/// authentication.
///
/// Stage one is byte-identical to [`decryption_key`] for the same
/// inputs; stage two is a single PBKDF2 round salted with the password.
pub fn login_key(username: &str, password: &str, iterations: u32) -> CryptoResult<String> {
    let stage1 = Zeroizing::new(decryption_key(username, password, iterations)?);
    let stage2 = pbkdf2_hmac_array::<Sha256, AES_KEY_SIZE>(stage1.as_slice(), password.as_bytes(), 1);
    Ok(hex::encode(stage2))
}

/// Derives both keys at once: `(login_key_hex, decryption_key_bytes)`.
pub fn derive_keys(
    username: &str,
    password: &str,
    iterations: u32,
) -> CryptoResult<(String, [u8; AES_KEY_SIZE])> {
    Ok((
        login_key(username, password, iterations)?,
        decryption_key(username, password, iterations)?,
    ))
}

fn check_iterations(iterations: u32) -> CryptoResult<()> {
    if iterations < MIN_ITERATIONS {
        return Err(CryptoError::InvalidIterations(iterations));
    }
    Ok(())
}
