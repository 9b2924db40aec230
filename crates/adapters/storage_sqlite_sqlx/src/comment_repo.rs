//! `SQLite` implementation of [`CommentRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use community_app::ports::CommentRepository;
use community_domain::comment::{Comment, CommentView, NewComment};
use community_domain::error::CommunityError;
use community_domain::id::{CommentId, PostId, UserId};
use community_domain::message::NewMessage;
use community_domain::page::{PageRequest, Paged};
use community_domain::time::Timestamp;

use crate::error::StorageError;
use crate::message_repo::insert_message;
use crate::store::{Count, SqliteStore, Wrapper, parse, timestamp};

impl<'r> FromRow<'r, SqliteRow> for Wrapper<Comment> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Comment {
            id: CommentId::new(row.try_get("id")?),
            post_id: PostId::new(row.try_get("post_id")?),
            user_id: UserId::new(row.try_get("user_id")?),
            content: row.try_get("content")?,
            ip: row.try_get("ip")?,
            status: parse(row, "status")?,
            created_at: timestamp(row, "createtime")?,
            updated_at: timestamp(row, "updatetime")?,
        }))
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper<CommentView> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let Wrapper(comment) = Wrapper::<Comment>::from_row(row)?;
        Ok(Self(CommentView {
            comment,
            nickname: row.try_get("nickname")?,
            avatar: row.try_get("avatar")?,
        }))
    }
}

const INSERT_COMMENT: &str = "INSERT INTO comments (post_id, user_id, content, ip, createtime, updatetime) VALUES (?, ?, ?, ?, ?, ?)";
const INCREMENT_COMMENTS: &str = "UPDATE posts SET comment_num = comment_num + 1 WHERE id = ?";
const DECREMENT_COMMENTS: &str = "UPDATE posts SET comment_num = MAX(comment_num - 1, 0) WHERE id = (SELECT post_id FROM comments WHERE id = ?)";
const SELECT_BY_ID: &str = "SELECT * FROM comments WHERE id = ?";
const SELECT_PAGE: &str = "SELECT c.*, u.nickname AS nickname, u.avatar AS avatar FROM comments c LEFT JOIN users u ON u.id = c.user_id WHERE c.post_id = ? AND c.status = 'normal' ORDER BY c.id DESC LIMIT ? OFFSET ?";
const COUNT_PAGE: &str = "SELECT COUNT(*) FROM comments WHERE post_id = ? AND status = 'normal'";
const HIDE_COMMENT: &str =
    "UPDATE comments SET status = 'hidden', updatetime = ? WHERE id = ? AND status = 'normal'";

async fn insert_comment(
    pool: &SqlitePool,
    comment: NewComment,
    notice: Option<NewMessage>,
) -> Result<CommentId, StorageError> {
    let at = comment.created_at.timestamp();
    let mut tx = pool.begin().await?;
    let id = sqlx::query(INSERT_COMMENT)
        .bind(comment.post_id.get())
        .bind(comment.user_id.get())
        .bind(&comment.content)
        .bind(comment.ip.as_deref())
        .bind(at)
        .bind(at)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();
    let id = CommentId::new(id);
    sqlx::query(INCREMENT_COMMENTS)
        .bind(comment.post_id.get())
        .execute(&mut *tx)
        .await?;
    if let Some(mut notice) = notice {
        notice.comment_id = Some(id);
        insert_message(&mut *tx, &notice).await?;
    }
    tx.commit().await?;
    Ok(id)
}

async fn hide(pool: &SqlitePool, id: CommentId, at: Timestamp) -> Result<(), StorageError> {
    let mut tx = pool.begin().await?;
    let hidden = sqlx::query(HIDE_COMMENT)
        .bind(at.timestamp())
        .bind(id.get())
        .execute(&mut *tx)
        .await?
        .rows_affected();
    if hidden == 1 {
        sqlx::query(DECREMENT_COMMENTS)
            .bind(id.get())
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(())
}

impl CommentRepository for SqliteStore {
    fn create_comment(
        &self,
        comment: NewComment,
        notice: Option<NewMessage>,
    ) -> impl Future<Output = Result<CommentId, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move { Ok(insert_comment(&pool, comment, notice).await?) }
    }

    fn find_comment(
        &self,
        id: CommentId,
    ) -> impl Future<Output = Result<Option<Comment>, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper<Comment>> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.get())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn list_comments(
        &self,
        post: PostId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<CommentView>, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let Count(total) = sqlx::query_as(COUNT_PAGE)
                .bind(post.get())
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;
            let rows: Vec<Wrapper<CommentView>> = sqlx::query_as(SELECT_PAGE)
                .bind(post.get())
                .bind(page.limit())
                .bind(page.offset())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Paged::new(total, Wrapper::list(rows)))
        }
    }

    fn hide_comment(
        &self,
        id: CommentId,
        at: Timestamp,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send {
        let pool = self.pool.clone();
        async move { Ok(hide(&pool, id, at).await?) }
    }
}
