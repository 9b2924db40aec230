//! Argon2id implementation of the [`PasswordHasher`] port.

use argon2::password_hash::{PasswordHasher as _, SaltString};
use argon2::{Argon2, PasswordHash, PasswordVerifier};

use community_app::ports::PasswordHasher;
use community_domain::error::CommunityError;

#[derive(Debug, thiserror::Error)]
#[error("failed to hash password: {0}")]
pub struct HashError(String);

impl From<HashError> for CommunityError {
    fn from(err: HashError) -> Self {
        Self::Storage(Box::new(err))
    }
}

/// Produces PHC strings, so the salt travels inside the stored hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn hash_password(&self, password: &str) -> Result<String, CommunityError> {
        let salt = SaltString::generate(rand::thread_rng());
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| HashError(err.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify_password(&self, password: &str, hash: &str) -> bool {
        PasswordHash::new(hash).is_ok_and(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
    }
}
