//! API key material generation.
//!
//! An API key is 32 random bytes, base64url-encoded. The first 8 characters
//! of the encoded plaintext are stored alongside the Argon2id hash as a
//! non-secret lookup prefix, since the hash itself can't be queried by.

use rand::RngCore;

/// Number of random bytes of key material.
const KEY_BYTES: usize = 32;
/// Length of the non-secret lookup prefix, in characters.
pub const KEY_PREFIX_LEN: usize = 8;

/// Generates a new random API key plaintext.
#[must_use]
pub fn generate_api_key() -> String {
    let mut bytes = [0u8; KEY_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    base64_url::encode(&bytes)
}

/// Extracts the non-secret lookup prefix from a plaintext key.
#[must_use]
pub fn key_prefix(plaintext: &str) -> String {
    plaintext.chars().take(KEY_PREFIX_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_keys_are_distinct() {
        assert_ne!(generate_api_key(), generate_api_key());
    }

    #[test]
    fn test_prefix_is_stable_prefix_of_plaintext() {
        let key = generate_api_key();
        let prefix = key_prefix(&key);
        assert_eq!(prefix.len(), KEY_PREFIX_LEN);
        assert!(key.starts_with(&prefix));
    }
}
