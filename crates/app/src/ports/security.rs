//! Security ports: password hashing and verification code delivery.

use std::future::Future;

use community_domain::error::CommunityError;
use community_domain::verification::VerificationCode;

/// One-way password hashing producing self-describing hash strings.
pub trait PasswordHasher {
    /// # Errors
    ///
    /// Returns an error when the hasher fails to produce a hash.
    fn hash_password(&self, password: &str) -> Result<String, CommunityError>;

    /// Returns `false` on mismatch and on malformed stored hashes.
    fn verify_password(&self, password: &str, hash: &str) -> bool;
}

/// Delivers a verification code to its mobile number.
pub trait CodeSender {
    fn send_code(
        &self,
        code: &VerificationCode,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send;
}
