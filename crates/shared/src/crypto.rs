//! Cryptographic helpers.

use sha2::{Digest, Sha256};

/// Computes the SHA-256 digest of the input bytes and returns it as a hex
/// string. Used to build strong ETags for rendered invoice PDFs.
pub fn sha256_hex(input: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex_known_vector() {
        assert_eq!(
            sha256_hex(b"test"),
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
    }

    #[test]
    fn test_sha256_hex_empty() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_sha256_hex_deterministic() {
        assert_eq!(sha256_hex(b"invoice"), sha256_hex(b"invoice"));
        assert_ne!(sha256_hex(b"invoice-1"), sha256_hex(b"invoice-2"));
    }
}
