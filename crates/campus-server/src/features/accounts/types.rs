//! Shared account types and credential hashing

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::models::{Role, UserProfile};

/// Public view of an account, safe to serialize in API responses
///
/// The password hash never leaves the commands in this module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub profile: UserProfile,
}

/// Hash a password with a fresh random salt
///
/// Stored form is `{salt}${hex(sha256(salt || password))}` so verification
/// can recover the salt without a separate column.
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    let digest = salted_digest(&salt, password);
    format!("{salt}${digest}")
}

/// Verify a password against a stored hash
///
/// Unparseable stored values verify as false rather than erroring, so a
/// corrupted row reads as bad credentials instead of a 500.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, digest)) => salted_digest(salt, password) == digest,
        None => false,
    }
}

fn salted_digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_round_trip() {
        let stored = hash_password("correct horse");
        assert!(verify_password("correct horse", &stored));
        assert!(!verify_password("wrong horse", &stored));
    }

    #[test]
    fn test_hashes_are_salted() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }

    #[test]
    fn test_malformed_stored_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-valid-stored-hash"));
        assert!(!verify_password("anything", ""));
    }
}
