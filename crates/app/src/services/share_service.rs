//! Share service — share targets, share logging, and statistics.

use community_domain::activity::{NewShare, ShareStats};
use community_domain::error::CommunityError;
use community_domain::id::PostId;
use community_domain::post::Post;

use crate::ports::{PostRepository, ShareRepository};

pub struct ShareService<R> {
    repo: R,
}

impl<R: PostRepository + ShareRepository> ShareService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// The post a share link may point to.
    ///
    /// # Errors
    ///
    /// Returns [`CommunityError::NotFound`] for a missing or hidden post.
    pub async fn shareable_post(&self, id: PostId) -> Result<Post, CommunityError> {
        self.repo
            .find_post(id)
            .await?
            .filter(|p| p.status.is_visible())
            .ok_or_else(|| CommunityError::not_found("post", id))
    }

    /// # Errors
    ///
    /// Returns [`CommunityError::NotFound`] when the post does not exist.
    pub async fn record(&self, share: NewShare) -> Result<(), CommunityError> {
        self.existing_post(share.post_id).await?;
        let post = share.post_id;
        self.repo.record_share(share).await?;
        tracing::debug!(post_id = %post, "share recorded");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`CommunityError::NotFound`] when the post does not exist.
    pub async fn stats(&self, post: PostId) -> Result<ShareStats, CommunityError> {
        self.existing_post(post).await?;
        self.repo.share_stats(post).await
    }

    async fn existing_post(&self, id: PostId) -> Result<Post, CommunityError> {
        self.repo
            .find_post(id)
            .await?
            .ok_or_else(|| CommunityError::not_found("post", id))
    }
}
