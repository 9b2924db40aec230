//! `SQLite` implementation of [`ReportRepository`] and [`FeedbackRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use community_app::ports::{FeedbackRepository, ReportRepository};
use community_domain::error::CommunityError;
use community_domain::feedback::{Feedback, NewFeedback};
use community_domain::id::{FeedbackId, ReportId, UserId};
use community_domain::page::{PageRequest, Paged};
use community_domain::report::{NewReport, ReportKind, ReportReason, TicketStatus};

use crate::error::StorageError;
use crate::store::{Count, SqliteStore, Wrapper, encode_images, images, timestamp};

impl<'r> FromRow<'r, SqliteRow> for Wrapper<ReportReason> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(ReportReason {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
        }))
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper<Feedback> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let status: String = row.try_get("status")?;
        let status = TicketStatus::parse(&status)
            .ok_or_else(|| sqlx::Error::Decode(format!("unknown ticket status {status}").into()))?;

        Ok(Self(Feedback {
            id: FeedbackId::new(row.try_get("id")?),
            user_id: UserId::new(row.try_get("user_id")?),
            kind: row.try_get("type")?,
            content: row.try_get("content")?,
            images: images(row, "images")?,
            contact: row.try_get("contact")?,
            status,
            reply: row.try_get("reply")?,
            created_at: timestamp(row, "createtime")?,
        }))
    }
}

const SELECT_REASONS: &str = "SELECT id, name FROM report_reasons WHERE type = ? AND status = 'normal' ORDER BY weigh DESC, id ASC";
const EXISTS_PENDING: &str = "SELECT EXISTS (SELECT 1 FROM reports WHERE user_id = ? AND type = ? AND target_id = ? AND status = 'pending')";
const INSERT_REPORT: &str = "INSERT INTO reports (user_id, type, target_id, reason, content, images, createtime, updatetime) VALUES (?, ?, ?, ?, ?, ?, ?, ?)";

const INSERT_FEEDBACK: &str = "INSERT INTO feedback (user_id, type, content, images, contact, createtime, updatetime) VALUES (?, ?, ?, ?, ?, ?, ?)";
const SELECT_FEEDBACK: &str =
    "SELECT * FROM feedback WHERE user_id = ? ORDER BY id DESC LIMIT ? OFFSET ?";
const COUNT_FEEDBACK: &str = "SELECT COUNT(*) FROM feedback WHERE user_id = ?";

impl ReportRepository for SqliteStore {
    fn list_reasons(
        &self,
        kind: ReportKind,
    ) -> impl Future<Output = Result<Vec<ReportReason>, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper<ReportReason>> = sqlx::query_as(SELECT_REASONS)
                .bind(kind.as_str())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::list(rows))
        }
    }

    fn has_pending_report(
        &self,
        user: UserId,
        kind: ReportKind,
        target_id: i64,
    ) -> impl Future<Output = Result<bool, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let (exists,): (bool,) = sqlx::query_as(EXISTS_PENDING)
                .bind(user.get())
                .bind(kind.as_str())
                .bind(target_id)
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(exists)
        }
    }

    fn create_report(
        &self,
        report: NewReport,
    ) -> impl Future<Output = Result<ReportId, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let images = encode_images(&report.images).map_err(StorageError::from)?;
            let at = report.created_at.timestamp();
            let result = sqlx::query(INSERT_REPORT)
                .bind(report.user_id.get())
                .bind(report.kind.as_str())
                .bind(report.target_id)
                .bind(&report.reason)
                .bind(report.content.as_deref())
                .bind(images)
                .bind(at)
                .bind(at)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(ReportId::new(result.last_insert_rowid()))
        }
    }
}

impl FeedbackRepository for SqliteStore {
    fn create_feedback(
        &self,
        feedback: NewFeedback,
    ) -> impl Future<Output = Result<FeedbackId, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let images = encode_images(&feedback.images).map_err(StorageError::from)?;
            let at = feedback.created_at.timestamp();
            let result = sqlx::query(INSERT_FEEDBACK)
                .bind(feedback.user_id.get())
                .bind(&feedback.kind)
                .bind(&feedback.content)
                .bind(images)
                .bind(feedback.contact.as_deref())
                .bind(at)
                .bind(at)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(FeedbackId::new(result.last_insert_rowid()))
        }
    }

    fn list_feedback(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<Feedback>, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let Count(total) = sqlx::query_as(COUNT_FEEDBACK)
                .bind(user.get())
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;
            let rows: Vec<Wrapper<Feedback>> = sqlx::query_as(SELECT_FEEDBACK)
                .bind(user.get())
                .bind(page.limit())
                .bind(page.offset())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Paged::new(total, Wrapper::list(rows)))
        }
    }
}

#[cfg(test)]
mod tests {
    use community_domain::time::now;

    use super::*;
    use crate::store::tests::{seed_user, setup};

    #[tokio::test]
    async fn should_return_seeded_reasons_by_weight() {
        let store = setup().await;

        let reasons = store.list_reasons(ReportKind::Comment).await.unwrap();

        let names: Vec<&str> = reasons.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["spam", "illegal", "vulgar", "sensitive", "other"]);
    }

    #[tokio::test]
    async fn should_detect_pending_report_for_same_target() {
        let store = setup().await;
        let user = seed_user(&store, "alice").await;
        let report = NewReport {
            user_id: user,
            kind: ReportKind::Post,
            target_id: 7,
            reason: "spam".to_string(),
            content: None,
            images: vec![],
            created_at: now(),
        };

        assert!(!store.has_pending_report(user, ReportKind::Post, 7).await.unwrap());
        store.create_report(report).await.unwrap();

        assert!(store.has_pending_report(user, ReportKind::Post, 7).await.unwrap());
        assert!(!store.has_pending_report(user, ReportKind::Comment, 7).await.unwrap());
    }

    #[tokio::test]
    async fn should_list_own_feedback_as_pending() {
        let store = setup().await;
        let alice = seed_user(&store, "alice").await;
        let bob = seed_user(&store, "bob").await;
        store
            .create_feedback(NewFeedback {
                user_id: alice,
                kind: "bug".to_string(),
                content: "The map is blank".to_string(),
                images: vec!["/uploads/image/a.png".to_string()],
                contact: None,
                created_at: now(),
            })
            .await
            .unwrap();

        let mine = store.list_feedback(alice, PageRequest::default()).await.unwrap();
        assert_eq!(mine.total, 1);
        assert_eq!(mine.list[0].status, TicketStatus::Pending);
        assert_eq!(mine.list[0].images.len(), 1);
        let theirs = store.list_feedback(bob, PageRequest::default()).await.unwrap();
        assert_eq!(theirs.total, 0);
    }
}
