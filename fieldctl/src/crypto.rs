use base64::{Engine as _, engine::general_purpose};
use rand::{Rng, distributions::Alphanumeric, thread_rng};

/// Generates a cryptographically secure API key with 256 bits of entropy.
///
/// The key is formatted as `fsk-{base64url_encoded_random_bytes}` where the
/// random bytes are 32 bytes of cryptographically secure random data. The
/// secret is shown to the caller exactly once, at creation time.
pub fn generate_api_key() -> String {
    let mut key_bytes = [0u8; 32];
    thread_rng().fill(&mut key_bytes);

    format!("fsk-{}", general_purpose::URL_SAFE_NO_PAD.encode(key_bytes))
}

/// Generates an opaque share token for public token-addressed resources
/// (estimate pages, consultations). The token itself is the capability: it is
/// unguessable and grants access without a session.
pub fn generate_share_token() -> String {
    let mut token_bytes = [0u8; 24];
    thread_rng().fill(&mut token_bytes);

    general_purpose::URL_SAFE_NO_PAD.encode(token_bytes)
}

/// Generates a temporary password issued when inviting a customer or
/// technician to their portal. Alphanumeric to survive copy/paste and email
/// clients.
pub fn generate_temp_password() -> String {
    thread_rng().sample_iter(&Alphanumeric).take(16).map(char::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_api_key_format() {
        let key = generate_api_key();

        assert!(key.starts_with("fsk-"));
        // "fsk-" (4) + base64url(32 bytes) (43)
        assert_eq!(key.len(), 47);

        let key_part = &key[4..];
        assert!(key_part.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_generate_api_key_uniqueness() {
        let mut keys = HashSet::new();
        for _ in 0..1000 {
            let key = generate_api_key();
            assert!(keys.insert(key), "Generated duplicate API key");
        }
    }

    #[test]
    fn test_generate_share_token_format() {
        let token = generate_share_token();

        // base64url(24 bytes) = 32 chars, no padding
        assert_eq!(token.len(), 32);
        assert!(!token.contains('='));
    }

    #[test]
    fn test_generate_share_token_uniqueness() {
        let mut tokens = HashSet::new();
        for _ in 0..1000 {
            assert!(tokens.insert(generate_share_token()), "Generated duplicate share token");
        }
    }

    #[test]
    fn test_generate_temp_password() {
        let password = generate_temp_password();
        assert_eq!(password.len(), 16);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
