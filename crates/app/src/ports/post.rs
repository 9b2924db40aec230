//! Post storage ports, including the like and favorite toggles.

use std::future::Future;

use community_domain::error::CommunityError;
use community_domain::id::{PostId, UserId};
use community_domain::message::NewMessage;
use community_domain::page::{PageRequest, Paged};
use community_domain::post::{NewPost, Post, PostFilter, PostView, SavedPost};
use community_domain::relation::Toggle;
use community_domain::time::Timestamp;

/// Persistence for posts and their extensions.
pub trait PostRepository {
    /// Insert the post, its extension row, and bump the category counter, atomically.
    fn create_post(&self, post: NewPost)
    -> impl Future<Output = Result<PostId, CommunityError>> + Send;

    /// Fetch the raw post row whatever its status.
    fn find_post(&self, id: PostId)
    -> impl Future<Output = Result<Option<Post>, CommunityError>> + Send;

    /// Fetch a visible post enriched for display.
    ///
    /// `viewer` fills the `is_liked` and `is_favorite` flags.
    fn view_post(
        &self,
        id: PostId,
        viewer: Option<UserId>,
    ) -> impl Future<Output = Result<Option<PostView>, CommunityError>> + Send;

    /// Visible posts, pinned first then newest.
    fn list_posts(
        &self,
        filter: PostFilter,
        viewer: Option<UserId>,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<PostView>, CommunityError>> + Send;

    /// Visible posts of one author, newest first.
    fn list_user_posts(
        &self,
        author: UserId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<PostView>, CommunityError>> + Send;

    fn latest_posts(
        &self,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<PostView>, CommunityError>> + Send;

    /// Add one view to a visible post.
    fn increment_views(&self, id: PostId)
    -> impl Future<Output = Result<(), CommunityError>> + Send;

    /// Hide the post and release its category counter, atomically.
    fn hide_post(
        &self,
        id: PostId,
        at: Timestamp,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send;
}

/// Like toggle with its counter and optional notice.
pub trait LikeRepository {
    /// Flip the like of `user` on `post`, adjust `like_num`, and insert
    /// `notice` when the like is created, all in one transaction.
    fn toggle_like(
        &self,
        post: PostId,
        user: UserId,
        notice: Option<NewMessage>,
    ) -> impl Future<Output = Result<Toggle, CommunityError>> + Send;
}

/// Favorite toggle and the favorites list.
pub trait FavoriteRepository {
    /// Flip the favorite and adjust `favorite_num` in one transaction.
    fn toggle_favorite(
        &self,
        user: UserId,
        post: PostId,
    ) -> impl Future<Output = Result<Toggle, CommunityError>> + Send;

    fn is_favorite(
        &self,
        user: UserId,
        post: PostId,
    ) -> impl Future<Output = Result<bool, CommunityError>> + Send;

    fn list_favorites(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<SavedPost>, CommunityError>> + Send;
}
