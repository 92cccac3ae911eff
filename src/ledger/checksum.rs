//! CRC32 checksum computation for journal entries
//!
//! Every entry read back from the journal is verified; a mismatch
//! aborts the open.

use crc32fast::Hasher;

/// Computes a CRC32 (IEEE) checksum over the provided data.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Verifies that the computed checksum matches the expected checksum.
pub fn verify_checksum(data: &[u8], expected: u32) -> bool {
    compute_checksum(data) == expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_is_stable_for_same_entry() {
        let entry = b"PUT 123456789";
        assert_eq!(compute_checksum(entry), compute_checksum(entry));
    }

    #[test]
    fn test_single_bit_flip_changes_checksum() {
        let mut entry = b"PUT 987654321".to_vec();
        let original = compute_checksum(&entry);
        entry[4] ^= 0x01;
        assert_ne!(original, compute_checksum(&entry));
    }

    #[test]
    fn test_verify_checksum() {
        let entry = b"DEL 123456789";
        let checksum = compute_checksum(entry);
        assert!(verify_checksum(entry, checksum));
        assert!(!verify_checksum(entry, checksum ^ 1));
    }
}
