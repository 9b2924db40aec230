//! Notification storage port.

use std::future::Future;

use community_domain::error::CommunityError;
use community_domain::id::{MessageId, UserId};
use community_domain::message::{MessageView, NewMessage, ReadTarget};
use community_domain::page::{PageRequest, Paged};

pub trait MessageRepository {
    fn create_message(
        &self,
        message: NewMessage,
    ) -> impl Future<Output = Result<MessageId, CommunityError>> + Send;

    fn count_unread(&self, user: UserId)
    -> impl Future<Output = Result<i64, CommunityError>> + Send;

    /// Messages addressed to `user`, newest first.
    fn list_messages(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<MessageView>, CommunityError>> + Send;

    /// Mark messages of `user` read; returns how many changed.
    fn mark_read(
        &self,
        user: UserId,
        target: ReadTarget,
    ) -> impl Future<Output = Result<u64, CommunityError>> + Send;
}
