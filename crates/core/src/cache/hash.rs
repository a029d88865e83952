//! Content digests stored next to cached schema bodies.

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of a schema body.
pub fn content_digest(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_stability() {
        assert_eq!(content_digest(r#"{"type":"object"}"#), content_digest(r#"{"type":"object"}"#));
    }

    #[test]
    fn test_digest_differs_by_content() {
        assert_ne!(content_digest(r#"{"type":"object"}"#), content_digest(r#"{"type":"array"}"#));
    }

    #[test]
    fn test_digest_format() {
        let digest = content_digest("");
        assert_eq!(digest, "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855");
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
