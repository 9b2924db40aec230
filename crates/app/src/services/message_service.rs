//! Message service — the notification inbox.

use community_domain::error::CommunityError;
use community_domain::id::UserId;
use community_domain::message::{MessageView, ReadTarget};
use community_domain::page::{PageRequest, Paged};

use crate::ports::MessageRepository;

pub struct MessageService<R> {
    repo: R,
}

impl<R: MessageRepository> MessageService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn unread_count(&self, user: UserId) -> Result<i64, CommunityError> {
        self.repo.count_unread(user).await
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Paged<MessageView>, CommunityError> {
        self.repo.list_messages(user, page).await
    }

    /// Messages of other users are silently left alone.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn mark_read(&self, user: UserId, target: ReadTarget) -> Result<u64, CommunityError> {
        self.repo.mark_read(user, target).await
    }
}
