//! Favorite service — bookmark toggling and the bookmark list.

use community_domain::error::CommunityError;
use community_domain::id::{PostId, UserId};
use community_domain::page::{PageRequest, Paged};
use community_domain::post::SavedPost;
use community_domain::relation::Toggle;

use crate::ports::{FavoriteRepository, PostRepository};

pub struct FavoriteService<R> {
    repo: R,
}

impl<R: PostRepository + FavoriteRepository> FavoriteService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// # Errors
    ///
    /// Returns [`CommunityError::NotFound`] for a missing or hidden post.
    pub async fn toggle(&self, user: UserId, post: PostId) -> Result<Toggle, CommunityError> {
        let visible = self
            .repo
            .find_post(post)
            .await?
            .is_some_and(|p| p.status.is_visible());
        if !visible {
            return Err(CommunityError::not_found("post", post));
        }
        let toggle = self.repo.toggle_favorite(user, post).await?;
        tracing::debug!(post_id = %post, user_id = %user, favorited = toggle.is_on(), "favorite toggled");
        Ok(toggle)
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Paged<SavedPost>, CommunityError> {
        self.repo.list_favorites(user, page).await
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn check(&self, user: UserId, post: PostId) -> Result<bool, CommunityError> {
        self.repo.is_favorite(user, post).await
    }
}
