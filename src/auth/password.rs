//! bcrypt password hashing.

use crate::Error;

/// Hash a password with bcrypt at the default cost.
///
/// # Errors
/// Returns [Error::HashingError] if the underlying hashing library fails.
pub fn hash_password(password: &str) -> Result<String, Error> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|error| Error::HashingError(error.to_string()))
}

/// Check `password` against a stored bcrypt hash.
///
/// # Errors
/// Returns [Error::HashingError] if the stored hash is malformed.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, Error> {
    bcrypt::verify(password, password_hash).map_err(|error| Error::HashingError(error.to_string()))
}
