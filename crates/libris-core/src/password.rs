//! Employee credential hashing.

use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::AppError;

/// Minimum accepted password length for employee credentials.
pub const MIN_PASSWORD_LENGTH: usize = 8;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to hash password: {e}")))
}

/// Checks `password` against a stored bcrypt hash.
///
/// A malformed stored hash is reported as an internal error rather than a
/// mismatch.
pub fn verify_password(password: &str, hashed: &str) -> Result<bool, AppError> {
    verify(password, hashed)
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to verify password: {e}")))
}
