// Password hashing and verification service

use crate::auth::error::AuthError;

/// Password service for hashing and verification
///
/// bcrypt generates a fresh random salt per hash and compares in constant
/// time. Both operations are CPU-bound, so they run on the blocking pool.
#[derive(Debug, Clone, Copy)]
pub struct PasswordService {
    cost: u32,
}

impl PasswordService {
    /// Create a service with the given bcrypt work factor
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a password with a random salt
    pub async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let password = password.to_owned();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?
            .map_err(|e| AuthError::PasswordHash(e.to_string()))
    }

    /// Verify a password against a stored hash
    ///
    /// A mismatch is `Ok(false)`, not an error. Only an unreadable stored
    /// hash or a failed worker produces `Err`.
    pub async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let password = password.to_owned();
        let hash = hash.to_owned();

        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?
            .map_err(|e| AuthError::PasswordHash(e.to_string()))
    }
}
