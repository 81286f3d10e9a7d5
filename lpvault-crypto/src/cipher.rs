//! AES and RSA primitives in the LastPass wire formats.
//!
//! The current AES text format is `!` + base64(iv) + `|` + base64(ct),
//! CBC with PKCS7 padding. Entries written by old clients carry no `!`
//! marker and are plain ECB blocks; [`aes_decrypt`] falls back to ECB
//! whenever the marker is absent and the length is block-aligned.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit};
use aes::Aes256;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::RngCore;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::error::{CryptoError, CryptoResult};

pub const AES_KEY_SIZE: usize = 32;
pub const AES_BLOCK_SIZE: usize = 16;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;
type Aes256EcbDec = ecb::Decryptor<Aes256>;

/// Encrypts UTF-8 plaintext into the current vault text format:
/// `!` + base64(16-byte random IV) + `|` + base64(CBC/PKCS7 ciphertext).
///
/// The empty string encrypts to an empty byte string with no marker,
/// mirroring how the vault stores absent values.
pub fn aes_encrypt(plaintext: &str, key: &[u8; AES_KEY_SIZE]) -> Vec<u8> {
    if plaintext.is_empty() {
        return Vec::new();
    }

    let mut iv = [0u8; AES_BLOCK_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut iv);

    let ciphertext =
        Aes256CbcEnc::new(key.into(), (&iv).into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

    let iv_b64 = BASE64.encode(iv);
    let ct_b64 = BASE64.encode(&ciphertext);

    let mut out = Vec::with_capacity(2 + iv_b64.len() + ct_b64.len());
    out.push(b'!');
    out.extend_from_slice(iv_b64.as_bytes());
    out.push(b'|');
    out.extend_from_slice(ct_b64.as_bytes());
    out
}

/// Decrypts a vault ciphertext, choosing the format by shape:
///
/// - empty input decrypts to empty output
/// - a leading `!` marks the current CBC format
/// - unmarked, block-aligned input is legacy ECB
///
/// Any structural violation (missing separator, bad base64, wrong IV
/// length, bad padding) is a [`CryptoError::Decryption`].
pub fn aes_decrypt(data: &[u8], key: &[u8; AES_KEY_SIZE]) -> CryptoResult<Vec<u8>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }

    if data[0] == b'!' {
        let body = &data[1..];
        let sep = body
            .iter()
            .position(|&b| b == b'|')
            .ok_or_else(|| CryptoError::Decryption("missing IV separator".into()))?;

        let iv = BASE64
            .decode(&body[..sep])
            .map_err(|e| CryptoError::Decryption(format!("invalid IV base64: {e}")))?;
        let ciphertext = BASE64
            .decode(&body[sep + 1..])
            .map_err(|e| CryptoError::Decryption(format!("invalid ciphertext base64: {e}")))?;

        let iv: [u8; AES_BLOCK_SIZE] = iv
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::Decryption(format!("IV must be 16 bytes, got {}", iv.len())))?;

        Aes256CbcDec::new(key.into(), (&iv).into())
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| CryptoError::Decryption("bad PKCS7 padding".into()))
    } else if data.len() % AES_BLOCK_SIZE == 0 {
        // Legacy entries from old clients: raw ECB blocks, no marker.
        Aes256EcbDec::new(key.into())
            .decrypt_padded_vec_mut::<Pkcs7>(data)
            .map_err(|_| CryptoError::Decryption("bad PKCS7 padding in legacy ciphertext".into()))
    } else {
        Err(CryptoError::Decryption(format!(
            "unrecognized ciphertext layout ({} bytes, no marker)",
            data.len()
        )))
    }
}

/// Decrypts a base64-wrapped vault ciphertext into a UTF-8 string.
///
/// The persisted session record uses this wrapping. Empty input decodes
/// to the empty string.
pub fn aes_decrypt_base64(data: &str, key: &[u8; AES_KEY_SIZE]) -> CryptoResult<String> {
    if data.is_empty() {
        return Ok(String::new());
    }

    let raw = BASE64
        .decode(data.trim())
        .map_err(|e| CryptoError::Decryption(format!("invalid base64: {e}")))?;
    let plaintext = aes_decrypt(&raw, key)?;

    String::from_utf8(plaintext)
        .map_err(|_| CryptoError::Decryption("plaintext is not valid UTF-8".into()))
}

/// Encrypts plaintext and base64-wraps the result, the inverse of
/// [`aes_decrypt_base64`].
pub fn encrypt_and_base64(plaintext: &str, key: &[u8; AES_KEY_SIZE]) -> String {
    BASE64.encode(aes_encrypt(plaintext, key))
}

/// Encrypts plaintext with an RSA public key (PEM, SPKI or PKCS#1).
///
/// Uses OAEP with SHA-1, matching observed server payloads.
pub fn rsa_encrypt(plaintext: &str, public_key_pem: &str) -> CryptoResult<Vec<u8>> {
    let key = parse_public_key(public_key_pem)?;
    key.encrypt(&mut rand::rngs::OsRng, Oaep::new::<Sha1>(), plaintext.as_bytes())
        .map_err(|e| CryptoError::Encryption(e.to_string()))
}

/// Decrypts an RSA-OAEP ciphertext with a private key (PEM, PKCS#1 or
/// PKCS#8) into a UTF-8 string.
pub fn rsa_decrypt(ciphertext: &[u8], private_key_pem: &str) -> CryptoResult<String> {
    let key = parse_private_key(private_key_pem)?;
    let plaintext = key
        .decrypt(Oaep::new::<Sha1>(), ciphertext)
        .map_err(|e| CryptoError::Decryption(e.to_string()))?;

    String::from_utf8(plaintext)
        .map_err(|_| CryptoError::Decryption("RSA plaintext is not valid UTF-8".into()))
}

/// Recovers the vault's RSA private key PEM from its stored form:
/// hex-decode, AES-ECB decrypt under the vault key, PKCS7 unpad, UTF-8.
pub fn decrypt_private_key(hex_blob: &str, vault_key: &[u8; AES_KEY_SIZE]) -> CryptoResult<String> {
    let encrypted = hex_to_bytes(hex_blob)?;
    if encrypted.is_empty() || encrypted.len() % AES_BLOCK_SIZE != 0 {
        return Err(CryptoError::Decryption(format!(
            "encrypted private key is not block-aligned ({} bytes)",
            encrypted.len()
        )));
    }

    let padded = Aes256EcbDec::new(vault_key.into())
        .decrypt_padded_vec_mut::<Pkcs7>(&encrypted)
        .map_err(|_| CryptoError::Decryption("bad PKCS7 padding in private key".into()))?;

    String::from_utf8(padded)
        .map_err(|_| CryptoError::Decryption("private key is not valid UTF-8".into()))
}

/// SHA-256 digest as a lowercase hex string.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// SHA-256 digest as a base64 string.
pub fn sha256_base64(data: &[u8]) -> String {
    BASE64.encode(Sha256::digest(data))
}

/// Decodes a hex string (upper or lower case) into bytes.
pub fn hex_to_bytes(hex_str: &str) -> CryptoResult<Vec<u8>> {
    Ok(hex::decode(hex_str)?)
}

fn parse_public_key(pem: &str) -> CryptoResult<RsaPublicKey> {
    if let Ok(key) = RsaPublicKey::from_public_key_pem(pem) {
        return Ok(key);
    }
    RsaPublicKey::from_pkcs1_pem(pem)
        .map_err(|e| CryptoError::InvalidKey(format!("unparseable RSA public key: {e}")))
}

fn parse_private_key(pem: &str) -> CryptoResult<RsaPrivateKey> {
    if let Ok(key) = RsaPrivateKey::from_pkcs1_pem(pem) {
        return Ok(key);
    }
    RsaPrivateKey::from_pkcs8_pem(pem)
        .map_err(|e| CryptoError::InvalidKey(format!("unparseable RSA private key: {e}")))
}
