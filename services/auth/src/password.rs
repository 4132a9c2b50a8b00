//! Credential encoding
//!
//! The storefront historically stores passwords with a reversible Base64
//! encoding. Flows only talk to [`CredentialHasher`], so a salted hash can be
//! configured instead without touching them.

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use std::sync::Arc;

use crate::config::PasswordScheme;
use crate::error::{AuthError, AuthResult};

/// Turns plaintext passwords into stored credentials and checks them back
pub trait CredentialHasher: Send + Sync {
    /// Encode a plaintext password for storage
    fn encode(&self, password: &str) -> AuthResult<String>;

    /// Check a plaintext password against a stored credential
    ///
    /// A credential this hasher cannot interpret never verifies.
    fn verify(&self, password: &str, stored: &str) -> bool;
}

/// Reversible Base64 encoding in the browser `btoa` form
///
/// Each character is one Latin-1 byte. Characters above U+00FF cannot be
/// encoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Encoder;

impl Base64Encoder {
    /// Recover the plaintext from a stored credential
    pub fn decode(&self, stored: &str) -> AuthResult<String> {
        let bytes = BASE64
            .decode(stored)
            .map_err(|e| AuthError::Credential(format!("Failed to decode credential: {}", e)))?;
        Ok(bytes.into_iter().map(char::from).collect())
    }
}

fn latin1_bytes(password: &str) -> AuthResult<Vec<u8>> {
    password
        .chars()
        .map(|c| {
            u8::try_from(c).map_err(|_| {
                AuthError::Credential(format!(
                    "Character U+{:04X} is outside the Latin-1 range",
                    u32::from(c)
                ))
            })
        })
        .collect()
}

impl CredentialHasher for Base64Encoder {
    fn encode(&self, password: &str) -> AuthResult<String> {
        Ok(BASE64.encode(latin1_bytes(password)?))
    }

    fn verify(&self, password: &str, stored: &str) -> bool {
        match latin1_bytes(password) {
            Ok(bytes) => BASE64.encode(bytes) == stored,
            Err(_) => false,
        }
    }
}

/// Salted Argon2id hashing
#[derive(Clone, Default)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl CredentialHasher for Argon2Hasher {
    fn encode(&self, password: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut rand::thread_rng());
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Credential(format!("Failed to hash password: {}", e)))?
            .to_string();
        Ok(hash)
    }

    fn verify(&self, password: &str, stored: &str) -> bool {
        match PasswordHash::new(stored) {
            Ok(parsed) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

/// Build the hasher for a configured scheme
pub fn hasher_for(scheme: PasswordScheme) -> Arc<dyn CredentialHasher> {
    match scheme {
        PasswordScheme::Base64 => Arc::new(Base64Encoder),
        PasswordScheme::Argon2 => Arc::new(Argon2Hasher::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_matches_browser_btoa() {
        let encoder = Base64Encoder;
        assert_eq!(encoder.encode("password123").unwrap(), "cGFzc3dvcmQxMjM=");
        assert_eq!(encoder.decode("cGFzc3dvcmQxMjM=").unwrap(), "password123");
    }

    #[test]
    fn test_base64_encodes_latin1_bytes() {
        let encoder = Base64Encoder;
        assert_eq!(encoder.encode("pässwort").unwrap(), "cORzc3dvcnQ=");
        assert_eq!(encoder.decode("cORzc3dvcnQ=").unwrap(), "pässwort");
        assert!(encoder.verify("pässwort", "cORzc3dvcnQ="));
    }

    #[test]
    fn test_base64_rejects_characters_above_latin1() {
        let encoder = Base64Encoder;
        assert!(matches!(
            encoder.encode("pass€word"),
            Err(AuthError::Credential(_))
        ));
        assert!(!encoder.verify("pass€word", "cGFzc4B3b3Jk"));
    }

    #[test]
    fn test_base64_verify() {
        let encoder = Base64Encoder;
        let stored = encoder.encode("correct horse").unwrap();

        assert!(encoder.verify("correct horse", &stored));
        assert!(!encoder.verify("correct horse ", &stored));
    }

    #[test]
    fn test_argon2_hashes_are_salted() {
        let hasher = Argon2Hasher::default();
        let first = hasher.encode("Sup3rSecret!").unwrap();
        let second = hasher.encode("Sup3rSecret!").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("Sup3rSecret!", &first));
        assert!(hasher.verify("Sup3rSecret!", &second));
        assert!(!hasher.verify("sup3rsecret!", &first));
    }

    #[test]
    fn test_argon2_rejects_foreign_credentials() {
        let hasher = Argon2Hasher::default();
        let legacy = Base64Encoder.encode("password123").unwrap();
        assert!(!hasher.verify("password123", &legacy));
    }
}
