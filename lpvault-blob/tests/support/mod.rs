//! Builders for crafting chunk-framed vault blobs in tests.

use lpvault_crypto::aes_encrypt;

pub const MASTER_KEY: &[u8; 32] = b"0123456789abcdef0123456789abcdef";
pub const SHARE_KEY: &[u8; 32] = b"fedcba9876543210fedcba9876543210";

/// 4-byte big-endian length prefix + bytes.
pub fn item(data: &[u8]) -> Vec<u8> {
    let mut out = (data.len() as u32).to_be_bytes().to_vec();
    out.extend_from_slice(data);
    out
}

/// AES-encrypted item under `key` (empty plaintext stays empty).
pub fn enc_item(plaintext: &str, key: &[u8; 32]) -> Vec<u8> {
    item(&aes_encrypt(plaintext, key))
}

/// 4-byte tag + 4-byte big-endian length + payload.
pub fn chunk(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = tag.to_vec();
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(payload);
    out
}

pub fn blob(chunks: &[Vec<u8>]) -> Vec<u8> {
    chunks.concat()
}

/// ACCT chunk with the full 30-slot layout; unnamed slots stay empty.
pub fn acct_chunk(
    key: &[u8; 32],
    id: &str,
    name: &str,
    group: &str,
    url: &str,
    username: &str,
    password: &str,
    share_id: &str,
) -> Vec<u8> {
    let mut slots: Vec<Vec<u8>> = vec![item(b""); 30];
    slots[0] = item(id.as_bytes());
    slots[1] = enc_item(name, key);
    slots[2] = enc_item(group, key);
    slots[3] = enc_item(url, key);
    slots[6] = item(share_id.as_bytes());
    slots[7] = enc_item(username, key);
    slots[8] = enc_item(password, key);
    chunk(b"ACCT", &slots.concat())
}

/// SHAR chunk whose folder key is hex(share_key) encrypted under the
/// master key, the valid 64-hex-character form.
pub fn shar_chunk(id: &str, name: &str, share_key: &[u8; 32], readonly: bool) -> Vec<u8> {
    shar_chunk_with_key_str(id, name, &hex::encode(share_key), Some(share_key), readonly)
}

/// SHAR chunk with an arbitrary decrypted key string, for invalid-length
/// cases. The folder name is encrypted under `name_key` when given,
/// else left empty.
pub fn shar_chunk_with_key_str(
    id: &str,
    name: &str,
    key_str: &str,
    name_key: Option<&[u8; 32]>,
    readonly: bool,
) -> Vec<u8> {
    let mut payload = item(id.as_bytes());
    payload.extend_from_slice(&match name_key {
        Some(key) => enc_item(name, key),
        None => item(b""),
    });
    payload.extend_from_slice(&enc_item(key_str, MASTER_KEY));
    payload.extend_from_slice(&item(if readonly { b"1" } else { b"0" }));
    chunk(b"SHAR", &payload)
}

/// ACFL chunk: account id, encrypted name, plain type, encrypted value,
/// checked flag.
pub fn acfl_chunk(key: &[u8; 32], account_id: &str, name: &str, field_type: &str, value: &str, checked: bool) -> Vec<u8> {
    let mut payload = item(account_id.as_bytes());
    payload.extend_from_slice(&enc_item(name, key));
    payload.extend_from_slice(&item(field_type.as_bytes()));
    payload.extend_from_slice(&enc_item(value, key));
    payload.extend_from_slice(&item(if checked { b"1" } else { b"0" }));
    chunk(b"ACFL", &payload)
}

/// ATTA chunk: id, parent account id, encrypted mimetype, plain storage
/// key, plain size, encrypted filename.
pub fn atta_chunk(key: &[u8; 32], id: &str, parent_id: &str, mimetype: &str, filename: &str) -> Vec<u8> {
    let mut payload = item(id.as_bytes());
    payload.extend_from_slice(&item(parent_id.as_bytes()));
    payload.extend_from_slice(&enc_item(mimetype, key));
    payload.extend_from_slice(&item(b"storage-key-1"));
    payload.extend_from_slice(&item(b"2048"));
    payload.extend_from_slice(&enc_item(filename, key));
    chunk(b"ATTA", &payload)
}
