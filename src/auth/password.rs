// src/auth/password.rs
//
// Argon2id digests in PHC string form (`$argon2id$v=19$m=...$salt$hash`).
// Cost parameters travel with each stored value, so verification keeps
// working if the defaults change.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Hash with a fresh random 16-byte salt
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|e| AppError::Other(format!("Password salt encoding failed: {}", e)))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Other(format!("Password hashing failed: {}", e)))
}

/// False for malformed stored values as well as mismatches
pub fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
