//! Post service — publishing, browsing, deleting, and liking posts.

use community_domain::error::{CommunityError, ForbiddenError};
use community_domain::id::{PostId, UserId};
use community_domain::message::NewMessage;
use community_domain::page::{PageRequest, Paged};
use community_domain::post::{NewPost, Post, PostFilter, PostView};
use community_domain::relation::Toggle;
use community_domain::time::now;

use crate::ports::{CategoryRepository, LikeRepository, PostRepository};

/// Application service for posts and likes.
pub struct PostService<R> {
    repo: R,
}

impl<R: PostRepository + LikeRepository + CategoryRepository> PostService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Publish a post into an existing, visible category.
    ///
    /// # Errors
    ///
    /// Returns [`CommunityError::Validation`] on bad input,
    /// [`CommunityError::NotFound`] when the category is missing or hidden,
    /// or a storage error from the repository.
    pub async fn create(&self, post: NewPost) -> Result<PostId, CommunityError> {
        post.validate()?;
        match self.repo.find_category(post.category_id).await? {
            Some(category) if category.status.is_visible() => {}
            _ => return Err(CommunityError::not_found("category", post.category_id)),
        }
        let author = post.user_id;
        let id = self.repo.create_post(post).await?;
        tracing::debug!(post_id = %id, user_id = %author, "post created");
        Ok(id)
    }

    /// Count a view and return the enriched post.
    ///
    /// # Errors
    ///
    /// Returns [`CommunityError::NotFound`] when the post is missing or hidden.
    pub async fn detail(
        &self,
        id: PostId,
        viewer: Option<UserId>,
    ) -> Result<PostView, CommunityError> {
        self.repo.increment_views(id).await?;
        self.repo
            .view_post(id, viewer)
            .await?
            .ok_or_else(|| CommunityError::not_found("post", id))
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list(
        &self,
        filter: PostFilter,
        viewer: Option<UserId>,
        page: PageRequest,
    ) -> Result<Paged<PostView>, CommunityError> {
        self.repo.list_posts(filter, viewer, page).await
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_by_author(
        &self,
        author: UserId,
        page: PageRequest,
    ) -> Result<Paged<PostView>, CommunityError> {
        self.repo.list_user_posts(author, page).await
    }

    /// Hide a post owned by `user`.
    ///
    /// # Errors
    ///
    /// Returns [`CommunityError::NotFound`] for a missing or hidden post and
    /// [`CommunityError::Forbidden`] when `user` is not the author.
    pub async fn delete(&self, id: PostId, user: UserId) -> Result<(), CommunityError> {
        let post = self.visible_post(id).await?;
        if post.user_id != user {
            return Err(ForbiddenError::NotOwner("post").into());
        }
        self.repo.hide_post(id, now()).await?;
        tracing::debug!(post_id = %id, user_id = %user, "post hidden");
        Ok(())
    }

    /// Like or unlike; the author hears about new likes from others.
    ///
    /// # Errors
    ///
    /// Returns [`CommunityError::NotFound`] for a missing or hidden post.
    pub async fn toggle_like(&self, id: PostId, user: UserId) -> Result<Toggle, CommunityError> {
        let post = self.visible_post(id).await?;
        let notice = NewMessage::like(post.user_id, user, post.id, &post.title, now());
        let toggle = self.repo.toggle_like(id, user, notice).await?;
        tracing::debug!(post_id = %id, user_id = %user, liked = toggle.is_on(), "like toggled");
        Ok(toggle)
    }

    async fn visible_post(&self, id: PostId) -> Result<Post, CommunityError> {
        self.repo
            .find_post(id)
            .await?
            .filter(|post| post.status.is_visible())
            .ok_or_else(|| CommunityError::not_found("post", id))
    }
}
