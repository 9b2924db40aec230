//! Report service — complaints about posts and comments.

use community_domain::error::{CommunityError, ConflictError};
use community_domain::id::{CommentId, PostId, ReportId};
use community_domain::report::{NewReport, ReportKind, ReportReason};

use crate::ports::{CommentRepository, PostRepository, ReportRepository};

pub struct ReportService<R> {
    repo: R,
}

impl<R: ReportRepository + PostRepository + CommentRepository> ReportService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn reasons(&self, kind: ReportKind) -> Result<Vec<ReportReason>, CommunityError> {
        self.repo.list_reasons(kind).await
    }

    /// File a report; one pending report per user and target.
    ///
    /// # Errors
    ///
    /// Returns [`CommunityError::NotFound`] when the target does not exist and
    /// [`CommunityError::Conflict`] when the same user already has a pending
    /// report on it.
    pub async fn create(&self, report: NewReport) -> Result<ReportId, CommunityError> {
        report.validate()?;
        let exists = match report.kind {
            ReportKind::Post => self
                .repo
                .find_post(PostId::new(report.target_id))
                .await?
                .is_some(),
            ReportKind::Comment => self
                .repo
                .find_comment(CommentId::new(report.target_id))
                .await?
                .is_some(),
        };
        if !exists {
            return Err(CommunityError::not_found(report.kind.as_str(), report.target_id));
        }
        if self
            .repo
            .has_pending_report(report.user_id, report.kind, report.target_id)
            .await?
        {
            return Err(ConflictError::Duplicate {
                entity: "report",
                key: format!("{}:{}", report.kind.as_str(), report.target_id),
            }
            .into());
        }
        let id = self.repo.create_report(report).await?;
        tracing::info!(report_id = %id, "report filed");
        Ok(id)
    }
}
