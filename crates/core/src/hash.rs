//! Content hashing for cache and deduplication keys.
//!
//! Hashes are computed over a normalized rendition of the body text so
//! that the same content yields the same key regardless of which
//! extraction path produced it.

use sha2::{Digest, Sha256};

/// Normalizes text for hashing: collapses all whitespace runs to single
/// spaces and lowercases the result.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Computes the SHA-256 digest of the normalized text, hex encoded.
///
/// Identical normalized text always yields the identical hash, so the
/// digest is safe to use as a write-once cache key.
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize(text).as_bytes());
    hasher.finalize().iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("Hello   \n\t world"), "hello world");
        assert_eq!(normalize("  leading and trailing  "), "leading and trailing");
    }

    #[test]
    fn test_hash_is_stable() {
        let a = content_hash("The quick brown fox");
        let b = content_hash("The quick brown fox");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_hash_ignores_case_and_spacing() {
        let a = content_hash("The Quick\nBrown  Fox");
        let b = content_hash("the quick brown fox");
        assert_eq!(a, b);
    }

    #[test]
    fn test_distinct_texts_hash_differently() {
        assert_ne!(content_hash("first article"), content_hash("second article"));
    }
}
