//! Length-prefixed framing readers.
//!
//! Both readers share the malformed-input policy the format requires:
//! a declared length that exceeds the remaining bytes is satisfied with
//! whatever remains, and the next read then observes an exhausted
//! stream. Nothing here ever fails; truncation is indistinguishable
//! from end of input.

/// One top-level record: a 4-byte tag and its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Tag bytes as ASCII when the tag is ASCII, lowercase hex otherwise.
    pub id: String,
    pub payload: &'a [u8],
}

/// Forward-only reader over the top-level chunk stream of a decoded blob.
pub struct ChunkReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ChunkReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Reads the next chunk: 4-byte tag + 4-byte big-endian length +
    /// payload. Returns `None` once a complete 8-byte header can no
    /// longer be read; a payload shorter than its declared length is
    /// returned as-is.
    pub fn read_chunk(&mut self) -> Option<Chunk<'a>> {
        let tag = self.take(4);
        if tag.len() < 4 {
            return None;
        }
        let id = tag_to_string(tag);

        let size_bytes = self.take(4);
        let size_bytes: [u8; 4] = size_bytes.try_into().ok()?;
        let size = u32::from_be_bytes(size_bytes) as usize;

        Some(Chunk {
            id,
            payload: self.take(size),
        })
    }

    fn take(&mut self, n: usize) -> &'a [u8] {
        let n = n.min(self.data.len() - self.pos);
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        slice
    }
}

/// Reader for the untagged length-prefixed items nested inside a chunk
/// payload.
pub struct ItemReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ItemReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { data: payload, pos: 0 }
    }

    /// Reads the next item: 4-byte big-endian length + bytes. Once the
    /// payload runs out (including a split length header) this returns
    /// the empty slice, and keeps returning it.
    pub fn read_item(&mut self) -> &'a [u8] {
        let size_bytes = self.take(4);
        let Ok(size_bytes) = <[u8; 4]>::try_from(size_bytes) else {
            return &[];
        };
        let size = u32::from_be_bytes(size_bytes) as usize;
        self.take(size)
    }

    fn take(&mut self, n: usize) -> &'a [u8] {
        let n = n.min(self.data.len() - self.pos);
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        slice
    }
}

fn tag_to_string(tag: &[u8]) -> String {
    if tag.is_ascii() {
        // ASCII bytes are valid UTF-8.
        String::from_utf8_lossy(tag).into_owned()
    } else {
        hex::encode(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_tag_kept_as_text() {
        assert_eq!(tag_to_string(b"ACCT"), "ACCT");
    }

    #[test]
    fn non_ascii_tag_rendered_as_hex() {
        assert_eq!(tag_to_string(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef");
    }

    #[test]
    fn item_reader_exhausted_yields_empty() {
        let mut items = ItemReader::new(&[]);
        assert_eq!(items.read_item(), b"");
        assert_eq!(items.read_item(), b"");
    }

    #[test]
    fn item_length_past_end_is_saturated() {
        // Declares 100 bytes but only 3 follow.
        let payload = [0, 0, 0, 100, b'a', b'b', b'c'];
        let mut items = ItemReader::new(&payload);
        assert_eq!(items.read_item(), b"abc");
        assert_eq!(items.read_item(), b"");
    }
}
