//! `SQLite` implementation of [`MessageRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqliteConnection};

use community_app::ports::MessageRepository;
use community_domain::error::CommunityError;
use community_domain::id::{CommentId, MessageId, PostId, UserId};
use community_domain::message::{Message, MessageKind, MessageView, NewMessage, ReadTarget};
use community_domain::page::{PageRequest, Paged};

use crate::error::StorageError;
use crate::store::{Count, SqliteStore, Wrapper, timestamp};

impl<'r> FromRow<'r, SqliteRow> for Wrapper<Message> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let kind: String = row.try_get("type")?;
        let kind = MessageKind::parse(&kind)
            .ok_or_else(|| sqlx::Error::Decode(format!("unknown message type {kind}").into()))?;
        let from_id: Option<i64> = row.try_get("from_id")?;
        let post_id: Option<i64> = row.try_get("post_id")?;
        let comment_id: Option<i64> = row.try_get("comment_id")?;

        Ok(Self(Message {
            id: MessageId::new(row.try_get("id")?),
            user_id: UserId::new(row.try_get("user_id")?),
            from_id: from_id.map(UserId::new),
            kind,
            title: row.try_get("title")?,
            content: row.try_get("content")?,
            post_id: post_id.map(PostId::new),
            comment_id: comment_id.map(CommentId::new),
            is_read: row.try_get("is_read")?,
            created_at: timestamp(row, "createtime")?,
        }))
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper<MessageView> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let Wrapper(message) = Wrapper::<Message>::from_row(row)?;
        Ok(Self(MessageView {
            message,
            from_nickname: row.try_get("from_nickname")?,
            from_avatar: row.try_get("from_avatar")?,
            post_title: row.try_get("post_title")?,
        }))
    }
}

const INSERT_MESSAGE: &str = "INSERT INTO messages (user_id, from_id, type, title, content, post_id, comment_id, createtime) VALUES (?, ?, ?, ?, ?, ?, ?, ?)";
const COUNT_UNREAD: &str = "SELECT COUNT(*) FROM messages WHERE user_id = ? AND is_read = 0";
const COUNT_ALL: &str = "SELECT COUNT(*) FROM messages WHERE user_id = ?";
const SELECT_PAGE: &str = "SELECT m.*, u.nickname AS from_nickname, u.avatar AS from_avatar, p.title AS post_title FROM messages m LEFT JOIN users u ON u.id = m.from_id LEFT JOIN posts p ON p.id = m.post_id WHERE m.user_id = ? ORDER BY m.id DESC LIMIT ? OFFSET ?";
const MARK_ONE: &str = "UPDATE messages SET is_read = 1 WHERE id = ? AND user_id = ? AND is_read = 0";
const MARK_ALL: &str = "UPDATE messages SET is_read = 1 WHERE user_id = ? AND is_read = 0";

/// Insert a notification on an open connection, usually inside a caller's transaction.
pub(crate) async fn insert_message(
    conn: &mut SqliteConnection,
    message: &NewMessage,
) -> Result<MessageId, sqlx::Error> {
    let id = sqlx::query(INSERT_MESSAGE)
        .bind(message.user_id.get())
        .bind(message.from_id.map(UserId::get))
        .bind(message.kind.as_str())
        .bind(&message.title)
        .bind(&message.content)
        .bind(message.post_id.map(PostId::get))
        .bind(message.comment_id.map(CommentId::get))
        .bind(message.created_at.timestamp())
        .execute(conn)
        .await?
        .last_insert_rowid();
    Ok(MessageId::new(id))
}

impl MessageRepository for SqliteStore {
    fn create_message(
        &self,
        message: NewMessage,
    ) -> impl Future<Output = Result<MessageId, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut conn = pool.acquire().await.map_err(StorageError::from)?;
            let id = insert_message(&mut conn, &message)
                .await
                .map_err(StorageError::from)?;

            Ok(id)
        }
    }

    fn count_unread(
        &self,
        user: UserId,
    ) -> impl Future<Output = Result<i64, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let Count(count) = sqlx::query_as(COUNT_UNREAD)
                .bind(user.get())
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(count)
        }
    }

    fn list_messages(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<MessageView>, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let Count(total) = sqlx::query_as(COUNT_ALL)
                .bind(user.get())
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;
            let rows: Vec<Wrapper<MessageView>> = sqlx::query_as(SELECT_PAGE)
                .bind(user.get())
                .bind(page.limit())
                .bind(page.offset())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Paged::new(total, Wrapper::list(rows)))
        }
    }

    fn mark_read(
        &self,
        user: UserId,
        target: ReadTarget,
    ) -> impl Future<Output = Result<u64, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let query = match target {
                ReadTarget::One(id) => sqlx::query(MARK_ONE).bind(id.get()).bind(user.get()),
                ReadTarget::All => sqlx::query(MARK_ALL).bind(user.get()),
            };
            let result = query.execute(&pool).await.map_err(StorageError::from)?;

            Ok(result.rows_affected())
        }
    }
}
