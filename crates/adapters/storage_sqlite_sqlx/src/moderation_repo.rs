//! `SQLite` implementation of [`PinRepository`] and [`AuditRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use community_app::ports::{AuditRepository, PinRepository};
use community_domain::error::{CommunityError, ConflictError};
use community_domain::id::{PostId, UserId};
use community_domain::message::NewMessage;
use community_domain::moderation::{Audit, AuditEntry, AuditStatus, PinEntry, PinKind, Review};
use community_domain::page::{PageRequest, Paged};
use community_domain::relation::Toggle;
use community_domain::status::Status;
use community_domain::time::Timestamp;

use crate::error::StorageError;
use crate::message_repo::insert_message;
use crate::store::{Count, SqliteStore, Wrapper, parse, timestamp, timestamp_opt};

impl<'r> FromRow<'r, SqliteRow> for Wrapper<PinEntry> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(PinEntry {
            post_id: PostId::new(row.try_get("post_id")?),
            admin_id: UserId::new(row.try_get("admin_id")?),
            admin_name: row.try_get("admin_name")?,
            pinned_at: timestamp(row, "pinned_at")?,
            end_time: timestamp_opt(row, "end_time")?,
            title: row.try_get("title")?,
            content: row.try_get("content")?,
            view_num: row.try_get("view_num")?,
            like_num: row.try_get("like_num")?,
            comment_num: row.try_get("comment_num")?,
        }))
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper<Audit> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let admin_id: Option<i64> = row.try_get("admin_id")?;
        Ok(Self(Audit {
            post_id: PostId::new(row.try_get("post_id")?),
            admin_id: admin_id.map(UserId::new),
            status: parse(row, "status")?,
            reason: row.try_get("reason")?,
            created_at: timestamp(row, "createtime")?,
            updated_at: timestamp(row, "updatetime")?,
        }))
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper<AuditEntry> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let Wrapper(audit) = Wrapper::<Audit>::from_row(row)?;
        Ok(Self(AuditEntry {
            audit,
            title: row.try_get("title")?,
            content: row.try_get("content")?,
            view_num: row.try_get("view_num")?,
            like_num: row.try_get("like_num")?,
            comment_num: row.try_get("comment_num")?,
            admin_name: row.try_get("admin_name")?,
        }))
    }
}

/// Statements for one pin table (`sticks` or `recommends`).
struct PinSql {
    delete: &'static str,
    insert: &'static str,
    flag_on: &'static str,
    flag_off: &'static str,
    exists: &'static str,
    count: &'static str,
    select: &'static str,
}

const STICK_SQL: PinSql = PinSql {
    delete: "DELETE FROM sticks WHERE post_id = ?",
    insert: "INSERT INTO sticks (post_id, admin_id, stick_time, end_time) VALUES (?, ?, ?, ?)",
    flag_on: "UPDATE posts SET is_stick = 1 WHERE id = ?",
    flag_off: "UPDATE posts SET is_stick = 0 WHERE id = ?",
    exists: "SELECT EXISTS (SELECT 1 FROM sticks WHERE post_id = ? AND (end_time IS NULL OR end_time > ?))",
    count: "SELECT COUNT(*) FROM sticks s JOIN posts p ON p.id = s.post_id AND p.status = 'normal' WHERE s.end_time IS NULL OR s.end_time > ?",
    select: "SELECT s.post_id, s.admin_id, a.nickname AS admin_name, s.stick_time AS pinned_at, s.end_time, p.title, p.content, p.view_num, p.like_num, p.comment_num FROM sticks s JOIN posts p ON p.id = s.post_id AND p.status = 'normal' LEFT JOIN users a ON a.id = s.admin_id WHERE s.end_time IS NULL OR s.end_time > ? ORDER BY s.stick_time DESC, s.id DESC LIMIT ? OFFSET ?",
};

const RECOMMEND_SQL: PinSql = PinSql {
    delete: "DELETE FROM recommends WHERE post_id = ?",
    insert: "INSERT INTO recommends (post_id, admin_id, recommend_time, end_time) VALUES (?, ?, ?, ?)",
    flag_on: "UPDATE posts SET is_recommend = 1 WHERE id = ?",
    flag_off: "UPDATE posts SET is_recommend = 0 WHERE id = ?",
    exists: "SELECT EXISTS (SELECT 1 FROM recommends WHERE post_id = ? AND (end_time IS NULL OR end_time > ?))",
    count: "SELECT COUNT(*) FROM recommends r JOIN posts p ON p.id = r.post_id AND p.status = 'normal' WHERE r.end_time IS NULL OR r.end_time > ?",
    select: "SELECT r.post_id, r.admin_id, a.nickname AS admin_name, r.recommend_time AS pinned_at, r.end_time, p.title, p.content, p.view_num, p.like_num, p.comment_num FROM recommends r JOIN posts p ON p.id = r.post_id AND p.status = 'normal' LEFT JOIN users a ON a.id = r.admin_id WHERE r.end_time IS NULL OR r.end_time > ? ORDER BY r.recommend_time DESC, r.id DESC LIMIT ? OFFSET ?",
};

fn pin_sql(kind: PinKind) -> &'static PinSql {
    match kind {
        PinKind::Stick => &STICK_SQL,
        PinKind::Recommend => &RECOMMEND_SQL,
    }
}

const SELECT_AUDIT: &str = "SELECT * FROM audits WHERE post_id = ?";
const SELECT_AUDIT_ENTRY: &str = "SELECT a.*, p.title, p.content, p.view_num, p.like_num, p.comment_num, u.nickname AS admin_name FROM audits a JOIN posts p ON p.id = a.post_id LEFT JOIN users u ON u.id = a.admin_id WHERE a.post_id = ?";
const SELECT_AUDIT_PAGE: &str = "SELECT a.*, p.title, p.content, p.view_num, p.like_num, p.comment_num, u.nickname AS admin_name FROM audits a JOIN posts p ON p.id = a.post_id LEFT JOIN users u ON u.id = a.admin_id WHERE a.status = ? ORDER BY a.createtime DESC, a.id DESC LIMIT ? OFFSET ?";
const COUNT_AUDITS: &str =
    "SELECT COUNT(*) FROM audits a JOIN posts p ON p.id = a.post_id WHERE a.status = ?";
const INSERT_AUDIT: &str =
    "INSERT INTO audits (post_id, status, createtime, updatetime) VALUES (?, 'pending', ?, ?)";
const REVIEW_AUDIT: &str = "UPDATE audits SET status = ?, reason = ?, admin_id = ?, updatetime = ? WHERE post_id = ? AND status = 'pending'";
const SELECT_POST_STATUS: &str = "SELECT status FROM posts WHERE id = ?";
const UPDATE_POST_STATUS: &str = "UPDATE posts SET status = ?, updatetime = ? WHERE id = ?";
const INCREMENT_CATEGORY: &str = "UPDATE categories SET post_count = post_count + 1 WHERE id = (SELECT category_id FROM posts WHERE id = ?)";
const DECREMENT_CATEGORY: &str = "UPDATE categories SET post_count = MAX(post_count - 1, 0) WHERE id = (SELECT category_id FROM posts WHERE id = ?)";

async fn toggle_pin(
    pool: &SqlitePool,
    sql: &PinSql,
    post: PostId,
    admin: UserId,
    end_time: Option<Timestamp>,
    at: Timestamp,
) -> Result<Toggle, StorageError> {
    let mut tx = pool.begin().await?;
    let removed = sqlx::query(sql.delete)
        .bind(post.get())
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let toggle = if removed > 0 {
        sqlx::query(sql.flag_off)
            .bind(post.get())
            .execute(&mut *tx)
            .await?;
        Toggle::Off
    } else {
        sqlx::query(sql.insert)
            .bind(post.get())
            .bind(admin.get())
            .bind(at.timestamp())
            .bind(end_time.map(|t| t.timestamp()))
            .execute(&mut *tx)
            .await?;
        sqlx::query(sql.flag_on)
            .bind(post.get())
            .execute(&mut *tx)
            .await?;
        Toggle::On
    };
    tx.commit().await?;
    Ok(toggle)
}

async fn list_pins(
    pool: &SqlitePool,
    sql: &PinSql,
    now: Timestamp,
    page: PageRequest,
) -> Result<Paged<PinEntry>, StorageError> {
    let Count(total) = sqlx::query_as(sql.count)
        .bind(now.timestamp())
        .fetch_one(pool)
        .await?;
    let rows: Vec<Wrapper<PinEntry>> = sqlx::query_as(sql.select)
        .bind(now.timestamp())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await?;
    Ok(Paged::new(total, Wrapper::list(rows)))
}

impl PinRepository for SqliteStore {
    fn toggle_pin(
        &self,
        kind: PinKind,
        post: PostId,
        admin: UserId,
        end_time: Option<Timestamp>,
        at: Timestamp,
    ) -> impl Future<Output = Result<Toggle, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move { Ok(toggle_pin(&pool, pin_sql(kind), post, admin, end_time, at).await?) }
    }

    fn list_pins(
        &self,
        kind: PinKind,
        now: Timestamp,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<PinEntry>, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move { Ok(list_pins(&pool, pin_sql(kind), now, page).await?) }
    }

    fn is_pinned(
        &self,
        kind: PinKind,
        post: PostId,
        now: Timestamp,
    ) -> impl Future<Output = Result<bool, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let (pinned,): (bool,) = sqlx::query_as(pin_sql(kind).exists)
                .bind(post.get())
                .bind(now.timestamp())
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(pinned)
        }
    }
}

/// Apply a review. Returns `false` when the audit was no longer pending.
async fn apply_review(
    pool: &SqlitePool,
    review: Review,
    notice: NewMessage,
) -> Result<bool, StorageError> {
    let at = review.reviewed_at.timestamp();
    let mut tx = pool.begin().await?;
    let reviewed = sqlx::query(REVIEW_AUDIT)
        .bind(review.decision.audit_status().as_str())
        .bind(review.reason.as_deref())
        .bind(review.admin_id.get())
        .bind(at)
        .bind(review.post_id.get())
        .execute(&mut *tx)
        .await?
        .rows_affected();
    if reviewed == 0 {
        return Ok(false);
    }

    let current: Option<(String,)> = sqlx::query_as(SELECT_POST_STATUS)
        .bind(review.post_id.get())
        .fetch_optional(&mut *tx)
        .await?;
    let target = review.decision.post_status();
    if current.is_some_and(|(status,)| status != target.as_str()) {
        sqlx::query(UPDATE_POST_STATUS)
            .bind(target.as_str())
            .bind(at)
            .bind(review.post_id.get())
            .execute(&mut *tx)
            .await?;
        let counter = match target {
            Status::Normal => INCREMENT_CATEGORY,
            Status::Hidden => DECREMENT_CATEGORY,
        };
        sqlx::query(counter)
            .bind(review.post_id.get())
            .execute(&mut *tx)
            .await?;
    }
    insert_message(&mut *tx, &notice).await?;
    tx.commit().await?;
    Ok(true)
}

impl AuditRepository for SqliteStore {
    fn find_audit(
        &self,
        post: PostId,
    ) -> impl Future<Output = Result<Option<Audit>, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper<Audit>> = sqlx::query_as(SELECT_AUDIT)
                .bind(post.get())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn find_audit_entry(
        &self,
        post: PostId,
    ) -> impl Future<Output = Result<Option<AuditEntry>, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper<AuditEntry>> = sqlx::query_as(SELECT_AUDIT_ENTRY)
                .bind(post.get())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn create_audit(
        &self,
        post: PostId,
        at: Timestamp,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT_AUDIT)
                .bind(post.get())
                .bind(at.timestamp())
                .bind(at.timestamp())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }

    fn review_audit(
        &self,
        review: Review,
        notice: NewMessage,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            if apply_review(&pool, review, notice).await? {
                Ok(())
            } else {
                Err(ConflictError::InvalidState("audit already reviewed").into())
            }
        }
    }

    fn list_audits(
        &self,
        status: AuditStatus,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<AuditEntry>, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let Count(total) = sqlx::query_as(COUNT_AUDITS)
                .bind(status.as_str())
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;
            let rows: Vec<Wrapper<AuditEntry>> = sqlx::query_as(SELECT_AUDIT_PAGE)
                .bind(status.as_str())
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
    use chrono::Duration;
    use community_app::ports::{MessageRepository, PostRepository};
    use community_domain::moderation::ReviewDecision;
    use community_domain::time::now;

    use super::*;
    use crate::store::tests::{scalar, seed_post, seed_user, setup};

    #[tokio::test]
    async fn should_mirror_stick_row_in_post_flag() {
        let store = setup().await;
        let admin = seed_user(&store, "admin").await;
        let post = seed_post(&store, admin, "Notice").await;

        let on = store
            .toggle_pin(PinKind::Stick, post, admin, None, now())
            .await
            .unwrap();
        assert_eq!(on, Toggle::On);
        assert!(store.find_post(post).await.unwrap().unwrap().is_stick);
        assert!(store.is_pinned(PinKind::Stick, post, now()).await.unwrap());
        assert!(!store.is_pinned(PinKind::Recommend, post, now()).await.unwrap());

        let pins = store
            .list_pins(PinKind::Stick, now(), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(pins.total, 1);
        assert_eq!(pins.list[0].admin_name.as_deref(), Some("admin"));

        let off = store
            .toggle_pin(PinKind::Stick, post, admin, None, now())
            .await
            .unwrap();
        assert_eq!(off, Toggle::Off);
        assert!(!store.find_post(post).await.unwrap().unwrap().is_stick);
    }

    #[tokio::test]
    async fn should_exclude_expired_pins_from_list_and_check() {
        let store = setup().await;
        let admin = seed_user(&store, "admin").await;
        let post = seed_post(&store, admin, "Notice").await;
        let ended = now() - Duration::hours(1);

        store
            .toggle_pin(PinKind::Recommend, post, admin, Some(ended), now() - Duration::days(1))
            .await
            .unwrap();

        assert!(!store.is_pinned(PinKind::Recommend, post, now()).await.unwrap());
        let pins = store
            .list_pins(PinKind::Recommend, now(), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(pins.total, 0);
        assert!(store.find_post(post).await.unwrap().unwrap().is_recommend);
    }

    #[tokio::test]
    async fn should_hide_post_and_notify_author_when_audit_rejected() {
        let store = setup().await;
        let author = seed_user(&store, "alice").await;
        let admin = seed_user(&store, "admin").await;
        let post = seed_post(&store, author, "Sofa").await;
        sqlx::query("UPDATE categories SET post_count = 1")
            .execute(&store.pool)
            .await
            .unwrap();
        store.create_audit(post, now()).await.unwrap();

        let notice = NewMessage::audit_result(
            author,
            post,
            "Sofa",
            ReviewDecision::Rejected,
            Some("spam"),
            now(),
        );
        let review = Review {
            post_id: post,
            admin_id: admin,
            decision: ReviewDecision::Rejected,
            reason: Some("spam".to_string()),
            reviewed_at: now(),
        };
        store.review_audit(review.clone(), notice.clone()).await.unwrap();

        let entry = store.find_audit_entry(post).await.unwrap().unwrap();
        assert_eq!(entry.audit.status, AuditStatus::Rejected);
        assert_eq!(entry.audit.admin_id, Some(admin));
        assert_eq!(entry.admin_name.as_deref(), Some("admin"));
        assert_eq!(
            store.find_post(post).await.unwrap().unwrap().status,
            Status::Hidden
        );
        assert_eq!(scalar(&store, "SELECT MAX(post_count) FROM categories WHERE id > ?", 0).await, 0);
        assert_eq!(store.count_unread(author).await.unwrap(), 1);

        let err = store.review_audit(review, notice).await.unwrap_err();
        assert!(matches!(err, CommunityError::Conflict(_)));
        assert_eq!(store.count_unread(author).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn should_list_audits_by_status() {
        let store = setup().await;
        let author = seed_user(&store, "alice").await;
        let first = seed_post(&store, author, "First").await;
        let second = seed_post(&store, author, "Second").await;
        store.create_audit(first, now()).await.unwrap();
        store.create_audit(second, now()).await.unwrap();

        let pending = store
            .list_audits(AuditStatus::Pending, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(pending.total, 2);
        assert_eq!(pending.list[0].audit.post_id, second);

        let approved = store
            .list_audits(AuditStatus::Approved, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(approved.total, 0);
    }
}
