//! Decoding for the LastPass vault blob format.
//!
//! A vault blob is base64 text whose decoded bytes are a sequence of
//! chunks: a 4-byte tag, a 4-byte big-endian length, then the payload.
//! Payloads in turn hold untagged length-prefixed items. [`parse_blob`]
//! walks the chunk stream once and joins `SHAR`, `ACCT`, `ACFL` and
//! `ATTA` records into an ordered [`Vault`] of decoded accounts and
//! shared folders.
//!
//! The decode is tolerant by contract: truncated framing is treated as
//! end of stream, a record that fails to decode is dropped and parsing
//! continues, and an item that fails to decrypt becomes an empty string.
//! A vault with some corrupt records yields a partial result set, never
//! a hard failure.

pub mod chunk;
pub mod model;
pub mod parser;

pub use chunk::{Chunk, ChunkReader, ItemReader};
pub use model::{Account, Attachment, Field, Share};
pub use parser::{parse_blob, Vault, VaultDecoder};
