//! Decoded vault entities.
//!
//! All entities are created during a single decode pass and live as
//! plain in-memory values; there is no update-in-place or deletion
//! path. Accounts reference their shared folder by id; the `Share`
//! itself is owned by the parse output, not by the account.

use serde::{Deserialize, Serialize};

/// Shared folder metadata. The 32-byte folder key is recovered from a
/// 64-hex-character string decrypted with the vault key; it is kept for
/// decryption only and never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Share {
    pub id: String,
    pub name: String,
    #[serde(skip)]
    pub key: [u8; 32],
    pub readonly: bool,
}

/// One vault entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub username: String,
    pub password: String,
    pub url: String,
    pub group: String,
    pub notes: String,
    /// `group + "/" + name` when the group is non-empty, else `name`.
    pub fullname: String,
    pub last_touch: String,
    pub last_modified_gmt: String,
    pub pwprotect: bool,
    pub favorite: bool,
    pub attach_present: bool,
    /// Custom fields in wire (display) order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    /// Id of the shared folder this entry belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_id: Option<String>,
}

impl Account {
    /// Looks up a custom field by name.
    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Secure notes are stored as accounts with a sentinel URL.
    pub fn is_secure_note(&self) -> bool {
        self.url == "http://sn"
    }
}

/// Custom field owned by its account, appended in wire order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub checked: bool,
}

/// File attachment metadata for an account. The file body itself lives
/// on the server; only the descriptor is part of the blob.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub parent_id: String,
    pub mimetype: String,
    pub filename: String,
    pub size: String,
    pub storage_key: String,
}
