//! `SQLite` implementation of [`TagRepository`].

use std::collections::BTreeSet;
use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use community_app::ports::TagRepository;
use community_domain::error::CommunityError;
use community_domain::id::{PostId, TagId};
use community_domain::page::{PageRequest, Paged};
use community_domain::tag::{Tag, TagSort};
use community_domain::time::Timestamp;

use crate::error::StorageError;
use crate::store::{Count, SqliteStore, Wrapper, timestamp};

impl<'r> FromRow<'r, SqliteRow> for Wrapper<Tag> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Tag {
            id: TagId::new(row.try_get("id")?),
            name: row.try_get("name")?,
            post_count: row.try_get("post_count")?,
            created_at: timestamp(row, "createtime")?,
        }))
    }
}

const INSERT: &str = "INSERT INTO tags (name, createtime) VALUES (?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM tags WHERE id = ?";
const SELECT_BY_NAME: &str = "SELECT * FROM tags WHERE name = ?";
const DELETE_LINKS: &str = "DELETE FROM post_tags WHERE tag_id = ?";
const DELETE_BY_ID: &str = "DELETE FROM tags WHERE id = ?";
const COUNT_ALL: &str = "SELECT COUNT(*) FROM tags";
const SELECT_BY_POST_COUNT: &str =
    "SELECT * FROM tags ORDER BY post_count DESC, id DESC LIMIT ? OFFSET ?";
const SELECT_BY_CREATETIME: &str =
    "SELECT * FROM tags ORDER BY createtime DESC, id DESC LIMIT ? OFFSET ?";
const SELECT_HOT: &str =
    "SELECT * FROM tags WHERE post_count > 0 ORDER BY post_count DESC, id ASC LIMIT ?";
const SELECT_FOR_POST: &str = "SELECT t.* FROM tags t JOIN post_tags pt ON pt.tag_id = t.id WHERE pt.post_id = ? ORDER BY t.id";
const COUNT_KNOWN: &str = "SELECT COUNT(*) FROM tags WHERE id IN (SELECT value FROM json_each(?))";
const SELECT_LINKED: &str = "SELECT tag_id FROM post_tags WHERE post_id = ?";
const DELETE_POST_LINKS: &str = "DELETE FROM post_tags WHERE post_id = ?";
const INSERT_LINK: &str = "INSERT OR IGNORE INTO post_tags (post_id, tag_id) VALUES (?, ?)";
const RECOUNT: &str =
    "UPDATE tags SET post_count = (SELECT COUNT(*) FROM post_tags WHERE tag_id = tags.id) WHERE id = ?";

/// Tags linked to a post, shared with the post detail view.
pub(crate) async fn post_tags(pool: &SqlitePool, post: PostId) -> Result<Vec<Tag>, sqlx::Error> {
    let rows: Vec<Wrapper<Tag>> = sqlx::query_as(SELECT_FOR_POST)
        .bind(post.get())
        .fetch_all(pool)
        .await?;
    Ok(Wrapper::list(rows))
}

async fn delete(pool: &SqlitePool, id: TagId) -> Result<(), StorageError> {
    let mut tx = pool.begin().await?;
    sqlx::query(DELETE_LINKS)
        .bind(id.get())
        .execute(&mut *tx)
        .await?;
    sqlx::query(DELETE_BY_ID)
        .bind(id.get())
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

async fn replace_links(
    pool: &SqlitePool,
    post: PostId,
    tags: Vec<TagId>,
) -> Result<(), StorageError> {
    let mut tx = pool.begin().await?;
    let previous: Vec<(i64,)> = sqlx::query_as(SELECT_LINKED)
        .bind(post.get())
        .fetch_all(&mut *tx)
        .await?;
    sqlx::query(DELETE_POST_LINKS)
        .bind(post.get())
        .execute(&mut *tx)
        .await?;
    for tag in &tags {
        sqlx::query(INSERT_LINK)
            .bind(post.get())
            .bind(tag.get())
            .execute(&mut *tx)
            .await?;
    }

    let touched: BTreeSet<i64> = previous
        .into_iter()
        .map(|(id,)| id)
        .chain(tags.iter().map(|tag| tag.get()))
        .collect();
    for tag in touched {
        sqlx::query(RECOUNT).bind(tag).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    Ok(())
}

impl TagRepository for SqliteStore {
    fn create_tag(
        &self,
        name: String,
        at: Timestamp,
    ) -> impl Future<Output = Result<TagId, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(INSERT)
                .bind(name)
                .bind(at.timestamp())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(TagId::new(result.last_insert_rowid()))
        }
    }

    fn find_tag(
        &self,
        id: TagId,
    ) -> impl Future<Output = Result<Option<Tag>, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper<Tag>> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.get())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn find_tag_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Tag>, CommunityError>> + Send {
        let pool = self.pool.clone();
        let name = name.to_string();
        async move {
            let row: Option<Wrapper<Tag>> = sqlx::query_as(SELECT_BY_NAME)
                .bind(name)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn delete_tag(&self, id: TagId) -> impl Future<Output = Result<(), CommunityError>> + Send {
        let pool = self.pool.clone();
        async move { Ok(delete(&pool, id).await?) }
    }

    fn list_tags(
        &self,
        sort: TagSort,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<Tag>, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let select = match sort {
                TagSort::PostCount => SELECT_BY_POST_COUNT,
                TagSort::CreateTime => SELECT_BY_CREATETIME,
            };
            let Count(total) = sqlx::query_as(COUNT_ALL)
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;
            let rows: Vec<Wrapper<Tag>> = sqlx::query_as(select)
                .bind(page.limit())
                .bind(page.offset())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Paged::new(total, Wrapper::list(rows)))
        }
    }

    fn hot_tags(&self, limit: i64) -> impl Future<Output = Result<Vec<Tag>, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper<Tag>> = sqlx::query_as(SELECT_HOT)
                .bind(limit)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::list(rows))
        }
    }

    fn tags_for_post(
        &self,
        post: PostId,
    ) -> impl Future<Output = Result<Vec<Tag>, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move { Ok(post_tags(&pool, post).await.map_err(StorageError::from)?) }
    }

    fn count_tags(
        &self,
        ids: Vec<TagId>,
    ) -> impl Future<Output = Result<i64, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let ids: Vec<i64> = ids.into_iter().map(TagId::get).collect();
            let ids = serde_json::to_string(&ids).map_err(StorageError::from)?;
            let Count(count) = sqlx::query_as(COUNT_KNOWN)
                .bind(ids)
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(count)
        }
    }

    fn set_post_tags(
        &self,
        post: PostId,
        tags: Vec<TagId>,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send {
        let pool = self.pool.clone();
        async move { Ok(replace_links(&pool, post, tags).await?) }
    }
}
