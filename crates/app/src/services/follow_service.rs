//! Follow service — following users, guarded by the blacklist.

use community_domain::error::{CommunityError, ForbiddenError, ValidationError};
use community_domain::id::UserId;
use community_domain::page::{PageRequest, Paged};
use community_domain::relation::Toggle;
use community_domain::user::RelatedUser;

use crate::ports::{BlacklistRepository, FollowRepository, UserRepository};

/// Application service for the follow graph.
pub struct FollowService<R> {
    repo: R,
}

impl<R: UserRepository + FollowRepository + BlacklistRepository> FollowService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Follow or unfollow `target`.
    ///
    /// Unfollowing is always allowed; following is refused while either
    /// user has blocked the other.
    ///
    /// # Errors
    ///
    /// Returns [`CommunityError::Validation`] when following oneself,
    /// [`CommunityError::NotFound`] for a missing or disabled target, and
    /// [`CommunityError::Forbidden`] when a block exists.
    pub async fn toggle(&self, user: UserId, target: UserId) -> Result<Toggle, CommunityError> {
        if user == target {
            return Err(ValidationError::Invalid {
                field: "follow_id",
                reason: "cannot follow yourself",
            }
            .into());
        }
        let active = self
            .repo
            .find_user(target)
            .await?
            .is_some_and(|u| u.status.is_visible());
        if !active {
            return Err(CommunityError::not_found("user", target));
        }

        if !self.repo.is_following(user, target).await?
            && (self.repo.is_blocked(user, target).await?
                || self.repo.is_blocked(target, user).await?)
        {
            return Err(ForbiddenError::Blocked.into());
        }

        let toggle = self.repo.toggle_follow(user, target).await?;
        tracing::debug!(user_id = %user, target_id = %target, followed = toggle.is_on(), "follow toggled");
        Ok(toggle)
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn following(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Paged<RelatedUser>, CommunityError> {
        self.repo.list_following(user, page).await
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn fans(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Paged<RelatedUser>, CommunityError> {
        self.repo.list_fans(user, page).await
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn check(&self, user: UserId, target: UserId) -> Result<bool, CommunityError> {
        self.repo.is_following(user, target).await
    }
}
