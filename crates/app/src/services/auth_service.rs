//! Auth service — registration, credential checks, and token refresh lookups.

use community_domain::error::{AuthError, CommunityError, ConflictError, ValidationError};
use community_domain::id::UserId;
use community_domain::time::now;
use community_domain::user::{NewUser, Registration, User};

use crate::ports::{PasswordHasher, UserRepository};

/// Application service for account creation and login.
pub struct AuthService<R, H> {
    repo: R,
    hasher: H,
}

impl<R: UserRepository, H: PasswordHasher> AuthService<R, H> {
    /// Create a new service backed by the given repository and hasher.
    pub fn new(repo: R, hasher: H) -> Self {
        Self { repo, hasher }
    }

    /// Register an account; the nickname starts as the username.
    ///
    /// # Errors
    ///
    /// Returns [`CommunityError::Validation`] on bad input,
    /// [`CommunityError::Conflict`] when the username or mobile is taken,
    /// or a storage error from the repository.
    pub async fn register(&self, registration: Registration) -> Result<UserId, CommunityError> {
        registration.validate()?;
        let username = registration.username.trim().to_string();

        if self.repo.find_user_by_username(&username).await?.is_some() {
            return Err(ConflictError::Duplicate {
                entity: "user",
                key: username,
            }
            .into());
        }
        if let Some(mobile) = &registration.mobile {
            if self.repo.find_user_by_mobile(mobile).await?.is_some() {
                return Err(ConflictError::Duplicate {
                    entity: "mobile",
                    key: mobile.clone(),
                }
                .into());
            }
        }

        let password_hash = self.hasher.hash_password(&registration.password)?;
        let id = self
            .repo
            .create_user(NewUser {
                nickname: username.clone(),
                username,
                password_hash,
                mobile: registration.mobile,
                created_at: now(),
            })
            .await?;
        tracing::info!(user_id = %id, "user registered");
        Ok(id)
    }

    /// Check credentials and stamp the login time.
    ///
    /// # Errors
    ///
    /// Returns [`CommunityError::NotFound`] for an unknown username,
    /// [`CommunityError::Unauthorized`] for a wrong password or a disabled
    /// account, or a storage error from the repository.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, CommunityError> {
        if username.trim().is_empty() {
            return Err(ValidationError::Required("username").into());
        }
        if password.is_empty() {
            return Err(ValidationError::Required("password").into());
        }

        let user = self
            .repo
            .find_user_by_username(username.trim())
            .await?
            .ok_or_else(|| CommunityError::not_found("user", username.trim()))?;
        if !user.status.is_visible() {
            return Err(AuthError::Disabled.into());
        }
        if !self.hasher.verify_password(password, &user.password_hash) {
            return Err(AuthError::WrongPassword.into());
        }

        let at = now();
        self.repo.record_login(user.id, at).await?;
        tracing::debug!(user_id = %user.id, "user logged in");
        Ok(User {
            last_login_at: Some(at),
            ..user
        })
    }

    /// Reload the account behind a token so a refreshed token carries the current role.
    ///
    /// # Errors
    ///
    /// Returns [`CommunityError::Unauthorized`] when the account is gone or disabled.
    pub async fn active_user(&self, id: UserId) -> Result<User, CommunityError> {
        match self.repo.find_user(id).await? {
            Some(user) if user.status.is_visible() => Ok(user),
            Some(_) => Err(AuthError::Disabled.into()),
            None => Err(AuthError::InvalidToken.into()),
        }
    }
}
