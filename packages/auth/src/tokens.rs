// ABOUTME: Session token generation and hashing
// ABOUTME: Raw tokens are handed to the client once; only SHA-256 hashes are stored

use base64::Engine;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Generate a cryptographically secure random session token.
/// Returns a base64-encoded 32-byte token.
pub fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let random_bytes: [u8; 32] = rng.gen();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(random_bytes)
}

/// Hash a token using SHA-256. This is what gets stored in the database.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Verify a token against a stored hash using constant-time comparison.
pub fn verify_token_hash(token: &str, stored_hash: &str) -> bool {
    use subtle::ConstantTimeEq;
    hash_token(token)
        .as_bytes()
        .ct_eq(stored_hash.as_bytes())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_tokens_are_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        // 32 bytes base64-encoded without padding
        assert_eq!(a.len(), 43);
    }

    #[test]
    fn test_hash_is_hex_sha256() {
        let hash = hash_token("some-token");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        // Deterministic
        assert_eq!(hash, hash_token("some-token"));
    }

    #[test]
    fn test_verify_token_hash() {
        let token = generate_token();
        let hash = hash_token(&token);

        assert!(verify_token_hash(&token, &hash));
        assert!(!verify_token_hash("wrong-token", &hash));
        assert!(!verify_token_hash(&token, "wrong-hash"));
    }
}
