//! Feedback service.

use community_domain::error::CommunityError;
use community_domain::feedback::{Feedback, NewFeedback};
use community_domain::id::{FeedbackId, UserId};
use community_domain::page::{PageRequest, Paged};

use crate::ports::FeedbackRepository;

pub struct FeedbackService<R> {
    repo: R,
}

impl<R: FeedbackRepository> FeedbackService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// # Errors
    ///
    /// Returns [`CommunityError::Validation`] when the type or content is blank.
    pub async fn create(&self, feedback: NewFeedback) -> Result<FeedbackId, CommunityError> {
        feedback.validate()?;
        self.repo.create_feedback(feedback).await
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Paged<Feedback>, CommunityError> {
        self.repo.list_feedback(user, page).await
    }
}
