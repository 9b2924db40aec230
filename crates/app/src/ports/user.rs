//! Account storage ports.

use std::future::Future;

use community_domain::error::CommunityError;
use community_domain::id::UserId;
use community_domain::time::Timestamp;
use community_domain::user::{NewUser, ProfileUpdate, User};
use community_domain::verification::{CodeEvent, VerificationCode};

/// Persistence for user accounts.
pub trait UserRepository {
    /// Insert a new account. A taken username surfaces as [`CommunityError::Conflict`].
    fn create_user(&self, user: NewUser)
    -> impl Future<Output = Result<UserId, CommunityError>> + Send;

    /// Fetch an account by id, whatever its status.
    fn find_user(&self, id: UserId)
    -> impl Future<Output = Result<Option<User>, CommunityError>> + Send;

    fn find_user_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<User>, CommunityError>> + Send;

    fn find_user_by_mobile(
        &self,
        mobile: &str,
    ) -> impl Future<Output = Result<Option<User>, CommunityError>> + Send;

    fn update_profile(
        &self,
        id: UserId,
        update: ProfileUpdate,
        at: Timestamp,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send;

    fn update_password(
        &self,
        id: UserId,
        password_hash: String,
        at: Timestamp,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send;

    fn record_login(
        &self,
        id: UserId,
        at: Timestamp,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send;
}

/// Persistence for one-time verification codes.
pub trait VerificationCodeRepository {
    fn save_code(
        &self,
        code: VerificationCode,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send;

    /// Mark a matching, unused and unexpired code as used.
    ///
    /// Returns `false` when no such code exists.
    fn consume_code(
        &self,
        mobile: &str,
        event: CodeEvent,
        code: &str,
        now: Timestamp,
    ) -> impl Future<Output = Result<bool, CommunityError>> + Send;
}
