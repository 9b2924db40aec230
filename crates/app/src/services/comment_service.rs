//! Comment service — commenting on posts.

use community_domain::comment::{CommentView, NewComment};
use community_domain::error::{CommunityError, ForbiddenError};
use community_domain::id::{CommentId, PostId, UserId};
use community_domain::message::NewMessage;
use community_domain::page::{PageRequest, Paged};
use community_domain::time::now;

use crate::ports::{CommentRepository, PostRepository};

pub struct CommentService<R> {
    repo: R,
}

impl<R: PostRepository + CommentRepository> CommentService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Comment on a visible post; the author is notified unless commenting on their own post.
    ///
    /// # Errors
    ///
    /// Returns [`CommunityError::Validation`] for blank content and
    /// [`CommunityError::NotFound`] for a missing or hidden post.
    pub async fn create(&self, comment: NewComment) -> Result<CommentId, CommunityError> {
        comment.validate()?;
        let post = self
            .repo
            .find_post(comment.post_id)
            .await?
            .filter(|p| p.status.is_visible())
            .ok_or_else(|| CommunityError::not_found("post", comment.post_id))?;
        let notice = NewMessage::comment(post.user_id, comment.user_id, post.id, &post.title, now());
        let id = self.repo.create_comment(comment, notice).await?;
        tracing::debug!(comment_id = %id, post_id = %post.id, "comment created");
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list(
        &self,
        post: PostId,
        page: PageRequest,
    ) -> Result<Paged<CommentView>, CommunityError> {
        self.repo.list_comments(post, page).await
    }

    /// # Errors
    ///
    /// Returns [`CommunityError::NotFound`] for a missing or already hidden
    /// comment and [`CommunityError::Forbidden`] when `user` is not its author.
    pub async fn delete(&self, id: CommentId, user: UserId) -> Result<(), CommunityError> {
        let comment = self
            .repo
            .find_comment(id)
            .await?
            .filter(|c| c.status.is_visible())
            .ok_or_else(|| CommunityError::not_found("comment", id))?;
        if comment.user_id != user {
            return Err(ForbiddenError::NotOwner("comment").into());
        }
        self.repo.hide_comment(id, now()).await
    }
}
