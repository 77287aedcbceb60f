//! Credential material helpers shared by the credential store adapters.
//!
//! Passwords are stored as `salt$digest` with both halves hex encoded; the
//! digest is SHA-256 over the raw salt bytes followed by the password
//! bytes. Token keys are 40 hex characters, the format existing clients
//! already expect.

use rand::RngCore;
use sha2::{Digest, Sha256};

const SALT_LEN: usize = 16;
const TOKEN_KEY_LEN: usize = 20;

fn digest_with_salt(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0_u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    format!("{}${}", hex::encode(salt), digest_with_salt(&salt, password))
}

/// Check a plaintext password against a stored `salt$digest` value.
///
/// A malformed stored value never verifies.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, digest)) = stored.split_once('$') else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    digest_with_salt(&salt, password) == digest
}

/// Mint a fresh random token key (40 hex characters).
pub fn generate_token_key() -> String {
    let mut key = [0_u8; TOKEN_KEY_LEN];
    rand::thread_rng().fill_bytes(&mut key);
    hex::encode(key)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[test]
    fn round_trips_a_password() {
        let stored = hash_password("correct horse battery staple");
        assert!(verify_password("correct horse battery staple", &stored));
        assert!(!verify_password("wrong", &stored));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let first = hash_password("pw");
        let second = hash_password("pw");
        assert_ne!(first, second);
        assert!(verify_password("pw", &first));
        assert!(verify_password("pw", &second));
    }

    #[rstest]
    #[case("")]
    #[case("no-dollar-sign")]
    #[case("zz-not-hex$abcdef")]
    fn malformed_stored_values_never_verify(#[case] stored: &str) {
        assert!(!verify_password("pw", stored));
    }

    #[test]
    fn token_keys_are_forty_hex_characters() {
        let key = generate_token_key();
        assert_eq!(key.len(), 40);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
