//! Audit service — post review workflow.

use community_domain::error::{CommunityError, ConflictError, ForbiddenError};
use community_domain::id::{PostId, UserId};
use community_domain::message::NewMessage;
use community_domain::moderation::{AuditEntry, AuditStatus, Review, ReviewDecision};
use community_domain::page::{PageRequest, Paged};
use community_domain::time::now;

use crate::ports::{AuditRepository, PostRepository};

/// Application service for post audits.
pub struct AuditService<R> {
    repo: R,
}

impl<R: PostRepository + AuditRepository> AuditService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Queue the caller's post for review.
    ///
    /// # Errors
    ///
    /// Returns [`CommunityError::NotFound`] for a missing post,
    /// [`CommunityError::Forbidden`] when the caller is not its author, and
    /// [`CommunityError::Conflict`] when an audit already exists.
    pub async fn submit(&self, post: PostId, user: UserId) -> Result<(), CommunityError> {
        let found = self
            .repo
            .find_post(post)
            .await?
            .ok_or_else(|| CommunityError::not_found("post", post))?;
        if found.user_id != user {
            return Err(ForbiddenError::NotOwner("post").into());
        }
        if self.repo.find_audit(post).await?.is_some() {
            return Err(ConflictError::Duplicate {
                entity: "audit",
                key: post.to_string(),
            }
            .into());
        }
        self.repo.create_audit(post, now()).await
    }

    /// Approve or reject a pending audit, update the post, and tell the author.
    ///
    /// # Errors
    ///
    /// Returns [`CommunityError::NotFound`] when no audit exists and
    /// [`CommunityError::Conflict`] when it was already reviewed.
    pub async fn review(
        &self,
        post: PostId,
        admin: UserId,
        decision: ReviewDecision,
        reason: Option<String>,
    ) -> Result<(), CommunityError> {
        let audit = self
            .repo
            .find_audit(post)
            .await?
            .ok_or_else(|| CommunityError::not_found("audit", post))?;
        if audit.status != AuditStatus::Pending {
            return Err(ConflictError::InvalidState("audit already reviewed").into());
        }
        let target = self
            .repo
            .find_post(post)
            .await?
            .ok_or_else(|| CommunityError::not_found("post", post))?;

        let at = now();
        let notice = NewMessage::audit_result(
            target.user_id,
            post,
            &target.title,
            decision,
            reason.as_deref(),
            at,
        );
        self.repo
            .review_audit(
                Review {
                    post_id: post,
                    admin_id: admin,
                    decision,
                    reason,
                    reviewed_at: at,
                },
                notice,
            )
            .await?;
        tracing::info!(
            post_id = %post,
            admin_id = %admin,
            status = decision.audit_status().as_str(),
            "audit reviewed"
        );
        Ok(())
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list(
        &self,
        status: AuditStatus,
        page: PageRequest,
    ) -> Result<Paged<AuditEntry>, CommunityError> {
        self.repo.list_audits(status, page).await
    }

    /// # Errors
    ///
    /// Returns [`CommunityError::NotFound`] when the post has no audit.
    pub async fn detail(&self, post: PostId) -> Result<AuditEntry, CommunityError> {
        self.repo
            .find_audit_entry(post)
            .await?
            .ok_or_else(|| CommunityError::not_found("audit", post))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fakes::{MemoryStore, seed_post};
    use community_domain::message::MessageKind;
    use community_domain::status::Status;

    fn make_service() -> (AuditService<MemoryStore>, PostId) {
        let store = MemoryStore::default();
        let post = seed_post(&store, 1);
        (AuditService::new(store), post)
    }

    #[tokio::test]
    async fn should_forbid_submit_when_not_author() {
        let (svc, post) = make_service();
        let result = svc.submit(post, UserId::new(2)).await;
        assert!(matches!(result, Err(CommunityError::Forbidden(_))));
    }

    #[tokio::test]
    async fn should_return_conflict_when_submitted_twice() {
        let (svc, post) = make_service();
        svc.submit(post, UserId::new(1)).await.unwrap();

        let result = svc.submit(post, UserId::new(1)).await;
        assert!(matches!(result, Err(CommunityError::Conflict(_))));
    }

    #[tokio::test]
    async fn should_hide_post_and_notify_author_when_rejected() {
        let (svc, post) = make_service();
        svc.submit(post, UserId::new(1)).await.unwrap();

        svc.review(
            post,
            UserId::new(9),
            ReviewDecision::Rejected,
            Some("spam".to_string()),
        )
        .await
        .unwrap();

        assert_eq!(svc.repo.post(post).unwrap().status, Status::Hidden);
        let entry = svc.detail(post).await.unwrap();
        assert_eq!(entry.audit.status, AuditStatus::Rejected);
        assert_eq!(entry.audit.admin_id, Some(UserId::new(9)));

        let messages = svc.repo.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].kind, MessageKind::System);
        assert_eq!(messages[0].user_id, UserId::new(1));
    }

    #[tokio::test]
    async fn should_return_conflict_when_reviewing_twice() {
        let (svc, post) = make_service();
        svc.submit(post, UserId::new(1)).await.unwrap();
        svc.review(post, UserId::new(9), ReviewDecision::Approved, None)
            .await
            .unwrap();

        let result = svc
            .review(post, UserId::new(9), ReviewDecision::Rejected, None)
            .await;
        assert!(matches!(
            result,
            Err(CommunityError::Conflict(ConflictError::InvalidState(_)))
        ));
    }

    #[tokio::test]
    async fn should_return_not_found_when_reviewing_without_audit() {
        let (svc, post) = make_service();
        let result = svc
            .review(post, UserId::new(9), ReviewDecision::Approved, None)
            .await;
        assert!(matches!(result, Err(CommunityError::NotFound(_))));
    }
}
