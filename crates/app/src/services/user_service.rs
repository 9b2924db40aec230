//! User service — profile, password management, and verification codes.

use rand::Rng;

use community_domain::error::{AuthError, CommunityError, ConflictError, ValidationError};
use community_domain::id::UserId;
use community_domain::time::now;
use community_domain::user::{ProfileUpdate, User, validate_mobile, validate_password};
use community_domain::verification::{CODE_LEN, CodeEvent, VerificationCode};

use crate::ports::{CodeSender, PasswordHasher, UserRepository, VerificationCodeRepository};

/// Application service for the signed-in user's own account.
pub struct UserService<R, H, C> {
    repo: R,
    hasher: H,
    sender: C,
}

impl<R, H, C> UserService<R, H, C>
where
    R: UserRepository + VerificationCodeRepository,
    H: PasswordHasher,
    C: CodeSender,
{
    pub fn new(repo: R, hasher: H, sender: C) -> Self {
        Self {
            repo,
            hasher,
            sender,
        }
    }

    /// # Errors
    ///
    /// Returns [`CommunityError::NotFound`] when the account does not exist.
    pub async fn profile(&self, id: UserId) -> Result<User, CommunityError> {
        self.repo
            .find_user(id)
            .await?
            .ok_or_else(|| CommunityError::not_found("user", id))
    }

    /// # Errors
    ///
    /// Returns [`CommunityError::Validation`] on bad input and
    /// [`CommunityError::Conflict`] when the mobile belongs to someone else.
    pub async fn update_profile(
        &self,
        id: UserId,
        update: ProfileUpdate,
    ) -> Result<(), CommunityError> {
        update.validate()?;
        if let Some(mobile) = &update.mobile {
            if let Some(owner) = self.repo.find_user_by_mobile(mobile).await? {
                if owner.id != id {
                    return Err(ConflictError::Duplicate {
                        entity: "mobile",
                        key: mobile.clone(),
                    }
                    .into());
                }
            }
        }
        self.profile(id).await?;
        self.repo.update_profile(id, update, now()).await
    }

    /// # Errors
    ///
    /// Returns [`CommunityError::Unauthorized`] when `old_password` does not verify.
    pub async fn change_password(
        &self,
        id: UserId,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), CommunityError> {
        if old_password.is_empty() {
            return Err(ValidationError::Required("oldpassword").into());
        }
        validate_password(new_password)?;
        let user = self.profile(id).await?;
        if !self.hasher.verify_password(old_password, &user.password_hash) {
            return Err(AuthError::WrongPassword.into());
        }
        let hash = self.hasher.hash_password(new_password)?;
        self.repo.update_password(id, hash, now()).await?;
        tracing::info!(user_id = %id, "password changed");
        Ok(())
    }

    /// Issue a fresh code, persist it, then hand it to the sender.
    ///
    /// # Errors
    ///
    /// Returns [`CommunityError::Validation`] for a malformed mobile number,
    /// or the sender's failure.
    pub async fn send_code(&self, mobile: &str, event: CodeEvent) -> Result<(), CommunityError> {
        validate_mobile(mobile)?;
        let digits = rand::thread_rng().gen_range(0..10_u32.pow(4));
        let code = VerificationCode::issue(
            mobile,
            event,
            format!("{digits:0width$}", width = CODE_LEN),
            now(),
        );
        self.repo.save_code(code.clone()).await?;
        self.sender.send_code(&code).await
    }

    /// # Errors
    ///
    /// Returns [`CommunityError::NotFound`] for an unknown mobile and
    /// [`CommunityError::Unauthorized`] when the code is wrong, used, or expired.
    pub async fn reset_password(
        &self,
        mobile: &str,
        code: &str,
        password: &str,
    ) -> Result<(), CommunityError> {
        validate_mobile(mobile)?;
        if code.trim().is_empty() {
            return Err(ValidationError::Required("code").into());
        }
        validate_password(password)?;

        let user = self
            .repo
            .find_user_by_mobile(mobile)
            .await?
            .ok_or_else(|| CommunityError::not_found("user", mobile))?;
        let consumed = self
            .repo
            .consume_code(mobile, CodeEvent::ResetPassword, code.trim(), now())
            .await?;
        if !consumed {
            return Err(AuthError::InvalidCode.into());
        }

        let hash = self.hasher.hash_password(password)?;
        self.repo.update_password(user.id, hash, now()).await?;
        tracing::info!(user_id = %user.id, "password reset");
        Ok(())
    }
}
