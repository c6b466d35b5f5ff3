//! SHA-256 facade: fixed-digest hash over a byte span, plus a stable-width
//! hex rendering for human-readable display.

use sha2::{Digest, Sha256};

pub const DIGEST_SIZE: usize = 32;

pub fn sha256(data: &[u8]) -> [u8; DIGEST_SIZE] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let mut digest = [0u8; DIGEST_SIZE];
    digest.copy_from_slice(&hasher.finalize());
    digest
}

/// Zero-padded lowercase hex, twice the digest length regardless of
/// leading-zero bytes.
pub fn to_hex(digest: &[u8]) -> String {
    hex::encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_32_bytes() {
        assert_eq!(sha256(b"hello").len(), DIGEST_SIZE);
    }

    #[test]
    fn hex_is_stable_width() {
        let digest = [0u8; DIGEST_SIZE];
        assert_eq!(to_hex(&digest).len(), DIGEST_SIZE * 2);
        assert_eq!(to_hex(&digest), "0".repeat(DIGEST_SIZE * 2));
    }

    #[test]
    fn known_vector() {
        let digest = sha256(b"");
        assert_eq!(
            to_hex(&digest),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
