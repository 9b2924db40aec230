//! History service — the per-user trail of viewed posts.

use community_domain::error::CommunityError;
use community_domain::id::{PostId, UserId};
use community_domain::page::{PageRequest, Paged};
use community_domain::post::SavedPost;
use community_domain::time::now;

use crate::ports::{HistoryRepository, PostRepository};

pub struct HistoryService<R> {
    repo: R,
}

impl<R: PostRepository + HistoryRepository> HistoryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// # Errors
    ///
    /// Returns [`CommunityError::NotFound`] for a missing or hidden post.
    pub async fn record(&self, user: UserId, post: PostId) -> Result<(), CommunityError> {
        let visible = self
            .repo
            .find_post(post)
            .await?
            .is_some_and(|p| p.status.is_visible());
        if !visible {
            return Err(CommunityError::not_found("post", post));
        }
        self.repo.record_view(user, post, now()).await
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Paged<SavedPost>, CommunityError> {
        self.repo.list_history(user, page).await
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn clear(&self, user: UserId) -> Result<u64, CommunityError> {
        self.repo.clear_history(user).await
    }
}
