//! Blacklist service — blocking users.

use community_domain::error::{CommunityError, ValidationError};
use community_domain::id::UserId;
use community_domain::page::{PageRequest, Paged};
use community_domain::relation::Toggle;
use community_domain::user::RelatedUser;

use crate::ports::{BlacklistRepository, UserRepository};

pub struct BlacklistService<R> {
    repo: R,
}

impl<R: UserRepository + BlacklistRepository> BlacklistService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Block or unblock `target`. Blocking severs follow edges both ways.
    ///
    /// # Errors
    ///
    /// Returns [`CommunityError::Validation`] when blocking oneself and
    /// [`CommunityError::NotFound`] for a missing or disabled target.
    pub async fn toggle(&self, user: UserId, target: UserId) -> Result<Toggle, CommunityError> {
        if user == target {
            return Err(ValidationError::Invalid {
                field: "block_id",
                reason: "cannot block yourself",
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
        let toggle = self.repo.toggle_block(user, target).await?;
        tracing::debug!(user_id = %user, target_id = %target, blocked = toggle.is_on(), "block toggled");
        Ok(toggle)
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Paged<RelatedUser>, CommunityError> {
        self.repo.list_blocked(user, page).await
    }

    /// Whether `user` blocked `target`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn check(&self, user: UserId, target: UserId) -> Result<bool, CommunityError> {
        self.repo.is_blocked(user, target).await
    }

    /// Whether `other` blocked `user`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn check_blocked_by(
        &self,
        user: UserId,
        other: UserId,
    ) -> Result<bool, CommunityError> {
        self.repo.is_blocked(other, user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::FollowRepository;
    use crate::services::fakes::MemoryStore;

    #[tokio::test]
    async fn should_drop_follow_edges_both_ways_when_blocking() {
        let store = MemoryStore::default();
        store.add_user(1);
        store.add_user(2);
        store.toggle_follow(UserId::new(1), UserId::new(2)).await.unwrap();
        store.toggle_follow(UserId::new(2), UserId::new(1)).await.unwrap();
        let svc = BlacklistService::new(store);

        let toggle = svc.toggle(UserId::new(1), UserId::new(2)).await.unwrap();

        assert!(toggle.is_on());
        for id in [1, 2] {
            let user = svc.repo.user(id).unwrap();
            assert_eq!((user.follow_num, user.fans_num), (0, 0));
        }
        assert!(svc.check(UserId::new(1), UserId::new(2)).await.unwrap());
        assert!(svc.check_blocked_by(UserId::new(2), UserId::new(1)).await.unwrap());
        assert!(!svc.check_blocked_by(UserId::new(1), UserId::new(2)).await.unwrap());
    }

    #[tokio::test]
    async fn should_reject_blocking_self() {
        let store = MemoryStore::default();
        store.add_user(1);
        let svc = BlacklistService::new(store);

        let result = svc.toggle(UserId::new(1), UserId::new(1)).await;
        assert!(matches!(result, Err(CommunityError::Validation(_))));
    }
}
