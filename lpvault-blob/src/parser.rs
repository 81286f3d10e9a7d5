//! Stateful single-pass vault decoder.
//!
//! Walks the chunk stream once, registering shared folders as they
//! appear and resolving each record's decryption key from the registry:
//! the share's key when the record references a registered share, the
//! vault master key otherwise. Shares are assumed to precede the
//! accounts that reference them; an unknown share id simply resolves to
//! the master key, and an `ACFL`/`ATTA` whose account is unknown is
//! dropped. No reordering or lookahead is attempted.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use lpvault_crypto::{aes_decrypt, hex_to_bytes, AES_KEY_SIZE};
use serde::Serialize;
use tracing::{debug, warn};

use crate::chunk::{ChunkReader, ItemReader};
use crate::model::{Account, Attachment, Field, Share};

// ============================================================================
// ACCT wire layout
// ============================================================================

// The ACCT payload is a fixed-order item sequence with no tags; the
// ordinals below are the wire contract. Every slot is consumed in
// lockstep even when its value is discarded.
const ACCT_ID: usize = 0;
const ACCT_NAME: usize = 1;
const ACCT_GROUP: usize = 2;
const ACCT_URL: usize = 3;
const ACCT_NOTES: usize = 4;
const ACCT_FAVORITE: usize = 5;
const ACCT_SHARE_ID: usize = 6;
const ACCT_USERNAME: usize = 7;
const ACCT_PASSWORD: usize = 8;
const ACCT_PWPROTECT: usize = 9;
const _ACCT_GENERATED_PASSWORD: usize = 10; // discarded
const _ACCT_SECURE_NOTE: usize = 11; // discarded
const ACCT_LAST_TOUCH: usize = 12;
const _ACCT_AUTOLOGIN: usize = 13; // discarded
const _ACCT_NEVER_AUTOFILL: usize = 14; // discarded
const _ACCT_REALM: usize = 15; // discarded
const _ACCT_FIID: usize = 16; // discarded
const _ACCT_CUSTOM_JS: usize = 17; // discarded
const _ACCT_SUBMIT_ID: usize = 18; // discarded
const _ACCT_CAPTCHA_ID: usize = 19; // discarded
const _ACCT_URID: usize = 20; // discarded
const _ACCT_BASIC_AUTH: usize = 21; // discarded
const _ACCT_METHOD: usize = 22; // discarded
const _ACCT_ACTION: usize = 23; // discarded
const _ACCT_GROUP_ID: usize = 24; // discarded
const _ACCT_DELETED: usize = 25; // discarded
const _ACCT_ATTACH_KEY: usize = 26; // discarded (attachment bodies are out of scope)
const ACCT_ATTACH_PRESENT: usize = 27;
const _ACCT_INDIVIDUAL_SHARE: usize = 28; // discarded
const ACCT_LAST_MODIFIED: usize = 29;
const ACCT_SLOTS: usize = 30;

/// Decoded contents of one vault blob, in first-seen order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Vault {
    pub accounts: Vec<Account>,
    pub shares: Vec<Share>,
}

impl Vault {
    /// Resolves the shared folder a decoded account belongs to, if any.
    pub fn share_for(&self, account: &Account) -> Option<&Share> {
        let id = account.share_id.as_deref()?;
        self.shares.iter().find(|s| s.id == id)
    }
}

/// Decodes a raw blob with the vault master key.
///
/// The blob is base64 text as fetched from the server; already-decoded
/// bytes are accepted too (the base64 layer is skipped when the input
/// does not decode).
pub fn parse_blob(blob: &[u8], master_key: &[u8; AES_KEY_SIZE]) -> Vault {
    match BASE64.decode(blob.trim_ascii()) {
        Ok(decoded) => VaultDecoder::new(master_key).parse(&decoded),
        Err(_) => VaultDecoder::new(master_key).parse(blob),
    }
}

/// Single-pass decoder holding the per-call registries.
///
/// Each decode pass owns its own registries; holding several decoded
/// vaults concurrently is safe.
pub struct VaultDecoder<'k> {
    master_key: &'k [u8; AES_KEY_SIZE],
    share_keys: HashMap<String, [u8; AES_KEY_SIZE]>,
    account_index: HashMap<String, usize>,
    accounts: Vec<Account>,
    shares: Vec<Share>,
}

impl<'k> VaultDecoder<'k> {
    pub fn new(master_key: &'k [u8; AES_KEY_SIZE]) -> Self {
        Self {
            master_key,
            share_keys: HashMap::new(),
            account_index: HashMap::new(),
            accounts: Vec::new(),
            shares: Vec::new(),
        }
    }

    /// Consumes the chunk stream and returns the decoded vault.
    ///
    /// Terminates when the reader is exhausted. A record that fails to
    /// decode is dropped and parsing continues with the next chunk.
    pub fn parse(mut self, data: &[u8]) -> Vault {
        let mut reader = ChunkReader::new(data);
        while let Some(chunk) = reader.read_chunk() {
            match chunk.id.as_str() {
                "SHAR" => self.handle_share(chunk.payload),
                "ACCT" => self.handle_account(chunk.payload),
                "ACFL" => self.handle_field(chunk.payload),
                "ATTA" => self.handle_attachment(chunk.payload),
                other => debug!(chunk = other, len = chunk.payload.len(), "skipping chunk"),
            }
        }
        Vault { accounts: self.accounts, shares: self.shares }
    }

    /// Key used for a record: the registered share's key when the
    /// record belongs to a known share, the vault master key otherwise.
    fn effective_key(&self, share_id: Option<&str>) -> &[u8; AES_KEY_SIZE] {
        share_id
            .and_then(|id| self.share_keys.get(id))
            .unwrap_or(self.master_key)
    }

    fn handle_share(&mut self, payload: &[u8]) {
        match self.decode_share(payload) {
            Some(share) => {
                self.share_keys.insert(share.id.clone(), share.key);
                self.shares.push(share);
            }
            None => warn!("dropping malformed SHAR chunk"),
        }
    }

    fn decode_share(&self, payload: &[u8]) -> Option<Share> {
        let mut items = ItemReader::new(payload);
        let id = std::str::from_utf8(items.read_item()).ok()?.to_owned();
        let name_enc = items.read_item();
        let key_enc = items.read_item();
        let readonly = items.read_item() == b"1";

        // The folder key arrives encrypted under the master key as a
        // 64-hex-character string; any other length invalidates the share.
        let key_hex = decrypt_item(key_enc, self.master_key);
        if key_hex.len() != 64 {
            return None;
        }
        let key_bytes = hex_to_bytes(&key_hex).ok()?;
        let key: [u8; AES_KEY_SIZE] = key_bytes.as_slice().try_into().ok()?;

        let name = decrypt_item(name_enc, &key);
        Some(Share { id, name, key, readonly })
    }

    fn handle_account(&mut self, payload: &[u8]) {
        match self.decode_account(payload) {
            Some(account) => {
                self.account_index.insert(account.id.clone(), self.accounts.len());
                self.accounts.push(account);
            }
            None => warn!("dropping malformed ACCT chunk"),
        }
    }

    fn decode_account(&self, payload: &[u8]) -> Option<Account> {
        let mut items = ItemReader::new(payload);
        let slots: Vec<&[u8]> = (0..ACCT_SLOTS).map(|_| items.read_item()).collect();

        let id = std::str::from_utf8(slots[ACCT_ID]).ok()?.to_owned();

        // The share id decides the key for every other slot, so it is
        // resolved first.
        let share_id_raw = std::str::from_utf8(slots[ACCT_SHARE_ID]).ok()?;
        let share_id = (!share_id_raw.is_empty()).then(|| share_id_raw.to_owned());
        let key = self.effective_key(share_id.as_deref());

        let name = decrypt_item(slots[ACCT_NAME], key);
        let group = decrypt_item(slots[ACCT_GROUP], key);
        let fullname = if group.is_empty() {
            name.clone()
        } else {
            format!("{group}/{name}")
        };

        Some(Account {
            id,
            fullname,
            username: decrypt_item(slots[ACCT_USERNAME], key),
            password: decrypt_item(slots[ACCT_PASSWORD], key),
            url: decrypt_item(slots[ACCT_URL], key),
            notes: decrypt_item(slots[ACCT_NOTES], key),
            last_touch: std::str::from_utf8(slots[ACCT_LAST_TOUCH]).ok()?.to_owned(),
            last_modified_gmt: std::str::from_utf8(slots[ACCT_LAST_MODIFIED]).ok()?.to_owned(),
            pwprotect: slots[ACCT_PWPROTECT] == b"1",
            favorite: slots[ACCT_FAVORITE] == b"1",
            attach_present: slots[ACCT_ATTACH_PRESENT] == b"1",
            fields: Vec::new(),
            attachments: Vec::new(),
            share_id,
            name,
            group,
        })
    }

    fn handle_field(&mut self, payload: &[u8]) {
        let mut items = ItemReader::new(payload);
        let Ok(account_id) = std::str::from_utf8(items.read_item()) else {
            warn!("dropping ACFL chunk with undecodable account id");
            return;
        };
        let Some(&idx) = self.account_index.get(account_id) else {
            debug!(%account_id, "dropping ACFL for unknown account");
            return;
        };
        let key = *self.effective_key(self.accounts[idx].share_id.as_deref());

        let name_enc = items.read_item();
        let field_type = String::from_utf8_lossy(items.read_item()).into_owned();
        let value_enc = items.read_item();
        let checked = items.read_item() == b"1";

        self.accounts[idx].fields.push(Field {
            name: decrypt_item(name_enc, &key),
            value: decrypt_item(value_enc, &key),
            field_type,
            checked,
        });
    }

    fn handle_attachment(&mut self, payload: &[u8]) {
        let mut items = ItemReader::new(payload);
        let id = String::from_utf8_lossy(items.read_item()).into_owned();
        let Ok(parent_id) = std::str::from_utf8(items.read_item()).map(str::to_owned) else {
            warn!("dropping ATTA chunk with undecodable parent id");
            return;
        };
        let Some(&idx) = self.account_index.get(parent_id.as_str()) else {
            debug!(%parent_id, "dropping ATTA for unknown account");
            return;
        };
        let key = *self.effective_key(self.accounts[idx].share_id.as_deref());

        let mimetype = decrypt_item(items.read_item(), &key);
        let storage_key = String::from_utf8_lossy(items.read_item()).into_owned();
        let size = String::from_utf8_lossy(items.read_item()).into_owned();
        let filename = decrypt_item(items.read_item(), &key);

        self.accounts[idx].attachments.push(Attachment {
            id,
            parent_id,
            mimetype,
            filename,
            size,
            storage_key,
        });
    }
}

/// Decrypts one item, mapping every failure to an empty string so a
/// single bad field never aborts its record.
fn decrypt_item(data: &[u8], key: &[u8; AES_KEY_SIZE]) -> String {
    if data.is_empty() {
        return String::new();
    }
    match aes_decrypt(data, key) {
        Ok(plaintext) => String::from_utf8_lossy(&plaintext).into_owned(),
        Err(err) => {
            debug!(%err, "item decryption failed");
            String::new()
        }
    }
}
