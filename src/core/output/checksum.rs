//! SHA-256 checksums of written files
//!
//! Checksums are taken over the exact bytes on disk, so two runs against an
//! unchanged source report the same value.

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of raw bytes (64 characters)
///
/// # Examples
///
/// ```
/// use courtside::core::output::checksum::checksum_bytes;
///
/// let checksum = checksum_bytes(b"[]");
/// assert_eq!(checksum.len(), 64);
/// ```
pub fn checksum_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    format!("{result:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_known_value() {
        assert_eq!(
            checksum_bytes(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_checksum_is_hex() {
        let checksum = checksum_bytes(b"team_name,wins\n");
        assert_eq!(checksum.len(), 64);
        assert!(checksum.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
