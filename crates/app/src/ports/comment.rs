//! Comment storage port.

use std::future::Future;

use community_domain::comment::{Comment, CommentView, NewComment};
use community_domain::error::CommunityError;
use community_domain::id::{CommentId, PostId};
use community_domain::message::NewMessage;
use community_domain::page::{PageRequest, Paged};
use community_domain::time::Timestamp;

pub trait CommentRepository {
    /// Insert the comment, bump `comment_num`, and insert `notice` pointing
    /// at the new comment, all in one transaction.
    fn create_comment(
        &self,
        comment: NewComment,
        notice: Option<NewMessage>,
    ) -> impl Future<Output = Result<CommentId, CommunityError>> + Send;

    fn find_comment(
        &self,
        id: CommentId,
    ) -> impl Future<Output = Result<Option<Comment>, CommunityError>> + Send;

    /// Visible comments of a post, newest first.
    fn list_comments(
        &self,
        post: PostId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<CommentView>, CommunityError>> + Send;

    /// Hide the comment and release the post counter, atomically.
    fn hide_comment(
        &self,
        id: CommentId,
        at: Timestamp,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send;
}
