//! Password hashing and verification
//!
//! New and changed passwords are stored as Argon2id PHC strings with a random
//! salt. Datastores written by the legacy tool hold unsalted SHA-256 hex
//! digests; those still verify, and the account service rehashes them on the
//! next successful login.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use sha2::{Digest, Sha256};

use crate::domain::result::{Error, Result};

/// Hash a password for storage as an Argon2id PHC string
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::credential(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored digest of either supported form
pub fn verify_password(password: &str, stored: &str) -> bool {
    if stored.starts_with("$argon2") {
        match PasswordHash::new(stored) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    } else if is_legacy_digest(stored) {
        legacy_digest(password) == stored
    } else {
        false
    }
}

/// The legacy tool's digest: unsalted SHA-256, lowercase hex.
/// Deterministic by construction; kept for verification only.
pub fn legacy_digest(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// True if a stored digest is in the legacy 64-hex form
pub fn is_legacy_digest(stored: &str) -> bool {
    stored.len() == 64 && stored.chars().all(|c| c.is_ascii_hexdigit())
}
