//! Journal entry format
//!
//! ```text
//! +------------------+
//! | Entry Length     | (u32 LE, includes itself and the checksum)
//! +------------------+
//! | Op               | (u8: 0 = put, 1 = delete)
//! +------------------+
//! | Key              | (length-prefixed UTF-8)
//! +------------------+
//! | Value            | (length-prefixed bytes, empty for delete)
//! +------------------+
//! | Checksum         | (u32 LE)
//! +------------------+
//! ```
//!
//! Checksum covers all bytes except the checksum itself.

use std::io::{self, Read};

use super::checksum::{compute_checksum, verify_checksum};

/// Smallest possible entry: length + op + empty key + empty value + checksum
pub const MIN_ENTRY_SIZE: usize = 4 + 1 + 4 + 4 + 4;

/// Mutation recorded by a journal entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOp {
    Put,
    Delete,
}

impl EntryOp {
    fn as_byte(self) -> u8 {
        match self {
            EntryOp::Put => 0,
            EntryOp::Delete => 1,
        }
    }

    fn from_byte(byte: u8) -> io::Result<Self> {
        match byte {
            0 => Ok(EntryOp::Put),
            1 => Ok(EntryOp::Delete),
            other => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Unknown journal op: {}", other),
            )),
        }
    }
}

/// One mutation in the ledger journal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    pub op: EntryOp,
    pub key: String,
    pub value: Vec<u8>,
}

impl JournalEntry {
    pub fn put(key: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            op: EntryOp::Put,
            key: key.into(),
            value,
        }
    }

    pub fn delete(key: impl Into<String>) -> Self {
        Self {
            op: EntryOp::Delete,
            key: key.into(),
            value: Vec::new(),
        }
    }

    fn serialize_body(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(1 + 4 + self.key.len() + 4 + self.value.len());

        buf.push(self.op.as_byte());

        buf.extend_from_slice(&(self.key.len() as u32).to_le_bytes());
        buf.extend_from_slice(self.key.as_bytes());

        buf.extend_from_slice(&(self.value.len() as u32).to_le_bytes());
        buf.extend_from_slice(&self.value);

        buf
    }

    /// Serialize the complete entry, including length prefix and checksum.
    pub fn serialize(&self) -> Vec<u8> {
        let body = self.serialize_body();
        let entry_length = (4 + body.len() + 4) as u32;

        let mut entry = Vec::with_capacity(entry_length as usize);
        entry.extend_from_slice(&entry_length.to_le_bytes());
        entry.extend_from_slice(&body);

        let checksum = compute_checksum(&entry);
        entry.extend_from_slice(&checksum.to_le_bytes());

        entry
    }

    /// Deserialize one entry from the front of `data`, verifying its checksum.
    ///
    /// Returns the entry and the number of bytes consumed.
    pub fn deserialize(data: &[u8]) -> io::Result<(Self, usize)> {
        if data.len() < MIN_ENTRY_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Entry too short",
            ));
        }

        let entry_length = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;

        if entry_length < MIN_ENTRY_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid entry length: {}", entry_length),
            ));
        }

        if data.len() < entry_length {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "Entry truncated: expected {} bytes, got {}",
                    entry_length,
                    data.len()
                ),
            ));
        }

        let checksum_offset = entry_length - 4;
        let stored_checksum = u32::from_le_bytes([
            data[checksum_offset],
            data[checksum_offset + 1],
            data[checksum_offset + 2],
            data[checksum_offset + 3],
        ]);

        if !verify_checksum(&data[..checksum_offset], stored_checksum) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Checksum mismatch: computed {:08x}, stored {:08x}",
                    compute_checksum(&data[..checksum_offset]),
                    stored_checksum
                ),
            ));
        }

        let mut cursor = io::Cursor::new(&data[4..checksum_offset]);

        let mut op_buf = [0u8; 1];
        cursor.read_exact(&mut op_buf)?;
        let op = EntryOp::from_byte(op_buf[0])?;

        let key = String::from_utf8(read_bytes(&mut cursor)?).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {}", e))
        })?;
        let value = read_bytes(&mut cursor)?;

        if cursor.position() as usize != checksum_offset - 4 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Trailing bytes inside entry",
            ));
        }

        Ok((Self { op, key, value }, entry_length))
    }
}

fn read_bytes<R: Read>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf)?;
    let len = u32::from_le_bytes(len_buf) as usize;

    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_put() -> JournalEntry {
        JournalEntry::put("123456789", br#"{"NIN":"123456789"}"#.to_vec())
    }

    #[test]
    fn test_put_entry_roundtrip() {
        let entry = sample_put();
        let bytes = entry.serialize();
        let (decoded, consumed) = JournalEntry::deserialize(&bytes).unwrap();
        assert_eq!(decoded, entry);
        assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn test_delete_entry_has_empty_value() {
        let bytes = JournalEntry::delete("123456789").serialize();
        let (decoded, _) = JournalEntry::deserialize(&bytes).unwrap();
        assert_eq!(decoded.op, EntryOp::Delete);
        assert!(decoded.value.is_empty());
    }

    #[test]
    fn test_deserialize_consumes_only_first_entry() {
        let mut bytes = sample_put().serialize();
        let first_len = bytes.len();
        bytes.extend(JournalEntry::delete("987654321").serialize());

        let (_, consumed) = JournalEntry::deserialize(&bytes).unwrap();
        assert_eq!(consumed, first_len);
    }

    #[test]
    fn test_checksum_detects_corruption() {
        let mut bytes = sample_put().serialize();
        let mid = bytes.len() / 2;
        bytes[mid] ^= 0xFF;

        let err = JournalEntry::deserialize(&bytes).unwrap_err();
        assert!(err.to_string().contains("Checksum mismatch"));
    }

    #[test]
    fn test_truncated_entry_rejected() {
        let bytes = sample_put().serialize();
        let err = JournalEntry::deserialize(&bytes[..bytes.len() - 1]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_unknown_op_rejected() {
        let mut bytes = sample_put().serialize();
        bytes[4] = 7;
        // re-seal so only the op byte is wrong
        let checksum_offset = bytes.len() - 4;
        let checksum = compute_checksum(&bytes[..checksum_offset]);
        bytes[checksum_offset..].copy_from_slice(&checksum.to_le_bytes());

        let err = JournalEntry::deserialize(&bytes).unwrap_err();
        assert!(err.to_string().contains("Unknown journal op"));
    }
}
