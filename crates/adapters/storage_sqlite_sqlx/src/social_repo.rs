//! `SQLite` implementation of [`FollowRepository`] and [`BlacklistRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqliteConnection, SqlitePool};

use community_app::ports::{BlacklistRepository, FollowRepository};
use community_domain::error::CommunityError;
use community_domain::id::UserId;
use community_domain::page::{PageRequest, Paged};
use community_domain::relation::{Edge, Toggle};
use community_domain::time::now;
use community_domain::user::RelatedUser;

use crate::error::StorageError;
use crate::store::{Count, SqliteStore, Wrapper, timestamp};

impl<'r> FromRow<'r, SqliteRow> for Wrapper<RelatedUser> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(RelatedUser {
            id: UserId::new(row.try_get("id")?),
            nickname: row.try_get("nickname")?,
            avatar: row.try_get("avatar")?,
            bio: row.try_get("bio")?,
            since: timestamp(row, "since")?,
        }))
    }
}

const DELETE_FOLLOW: &str = "DELETE FROM follows WHERE user_id = ? AND follow_id = ?";
const INSERT_FOLLOW: &str = "INSERT INTO follows (user_id, follow_id, createtime) VALUES (?, ?, ?)";
const INCREMENT_FOLLOWING: &str = "UPDATE users SET follow_num = follow_num + 1 WHERE id = ?";
const INCREMENT_FANS: &str = "UPDATE users SET fans_num = fans_num + 1 WHERE id = ?";
const DECREMENT_FOLLOWING: &str =
    "UPDATE users SET follow_num = MAX(follow_num - 1, 0) WHERE id = ?";
const DECREMENT_FANS: &str = "UPDATE users SET fans_num = MAX(fans_num - 1, 0) WHERE id = ?";
const EXISTS_FOLLOW: &str =
    "SELECT EXISTS (SELECT 1 FROM follows WHERE user_id = ? AND follow_id = ?)";
const SELECT_FOLLOWING: &str = "SELECT u.id, u.nickname, u.avatar, u.bio, f.createtime AS since FROM follows f JOIN users u ON u.id = f.follow_id AND u.status = 'normal' WHERE f.user_id = ? ORDER BY f.id DESC LIMIT ? OFFSET ?";
const COUNT_FOLLOWING: &str = "SELECT COUNT(*) FROM follows f JOIN users u ON u.id = f.follow_id AND u.status = 'normal' WHERE f.user_id = ?";
const SELECT_FANS: &str = "SELECT u.id, u.nickname, u.avatar, u.bio, f.createtime AS since FROM follows f JOIN users u ON u.id = f.user_id AND u.status = 'normal' WHERE f.follow_id = ? ORDER BY f.id DESC LIMIT ? OFFSET ?";
const COUNT_FANS: &str = "SELECT COUNT(*) FROM follows f JOIN users u ON u.id = f.user_id AND u.status = 'normal' WHERE f.follow_id = ?";

const DELETE_BLOCK: &str = "DELETE FROM blacklist WHERE user_id = ? AND block_id = ?";
const INSERT_BLOCK: &str = "INSERT INTO blacklist (user_id, block_id, createtime) VALUES (?, ?, ?)";
const EXISTS_BLOCK: &str =
    "SELECT EXISTS (SELECT 1 FROM blacklist WHERE user_id = ? AND block_id = ?)";
const SELECT_BLOCKED: &str = "SELECT u.id, u.nickname, u.avatar, u.bio, b.createtime AS since FROM blacklist b JOIN users u ON u.id = b.block_id WHERE b.user_id = ? ORDER BY b.id DESC LIMIT ? OFFSET ?";
const COUNT_BLOCKED: &str = "SELECT COUNT(*) FROM blacklist b JOIN users u ON u.id = b.block_id WHERE b.user_id = ?";

/// Delete one follow edge and release its counters. Returns whether it existed.
async fn remove_follow(
    conn: &mut SqliteConnection,
    edge: Edge<UserId>,
) -> Result<bool, sqlx::Error> {
    let removed = sqlx::query(DELETE_FOLLOW)
        .bind(edge.from.get())
        .bind(edge.to.get())
        .execute(&mut *conn)
        .await?
        .rows_affected();
    if removed == 0 {
        return Ok(false);
    }
    sqlx::query(DECREMENT_FOLLOWING)
        .bind(edge.from.get())
        .execute(&mut *conn)
        .await?;
    sqlx::query(DECREMENT_FANS)
        .bind(edge.to.get())
        .execute(&mut *conn)
        .await?;
    Ok(true)
}

async fn toggle_follow(
    pool: &SqlitePool,
    edge: Edge<UserId>,
) -> Result<Toggle, StorageError> {
    let mut tx = pool.begin().await?;
    let toggle = if remove_follow(&mut *tx, edge).await? {
        Toggle::Off
    } else {
        sqlx::query(INSERT_FOLLOW)
            .bind(edge.from.get())
            .bind(edge.to.get())
            .bind(now().timestamp())
            .execute(&mut *tx)
            .await?;
        sqlx::query(INCREMENT_FOLLOWING)
            .bind(edge.from.get())
            .execute(&mut *tx)
            .await?;
        sqlx::query(INCREMENT_FANS)
            .bind(edge.to.get())
            .execute(&mut *tx)
            .await?;
        Toggle::On
    };
    tx.commit().await?;
    Ok(toggle)
}

async fn toggle_block(
    pool: &SqlitePool,
    user: UserId,
    target: UserId,
) -> Result<Toggle, StorageError> {
    let mut tx = pool.begin().await?;
    let removed = sqlx::query(DELETE_BLOCK)
        .bind(user.get())
        .bind(target.get())
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let toggle = if removed > 0 {
        Toggle::Off
    } else {
        sqlx::query(INSERT_BLOCK)
            .bind(user.get())
            .bind(target.get())
            .bind(now().timestamp())
            .execute(&mut *tx)
            .await?;
        for edge in Edge::between(user, target) {
            if remove_follow(&mut *tx, edge).await? {
                tracing::debug!(from = %edge.from, to = %edge.to, "follow severed by block");
            }
        }
        Toggle::On
    };
    tx.commit().await?;
    Ok(toggle)
}

async fn related_page(
    pool: &SqlitePool,
    (count_sql, select_sql): (&'static str, &'static str),
    user: UserId,
    page: PageRequest,
) -> Result<Paged<RelatedUser>, StorageError> {
    let Count(total) = sqlx::query_as(count_sql)
        .bind(user.get())
        .fetch_one(pool)
        .await?;
    let rows: Vec<Wrapper<RelatedUser>> = sqlx::query_as(select_sql)
        .bind(user.get())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await?;
    Ok(Paged::new(total, Wrapper::list(rows)))
}

async fn exists(
    pool: &SqlitePool,
    sql: &'static str,
    user: UserId,
    target: UserId,
) -> Result<bool, StorageError> {
    let (exists,): (bool,) = sqlx::query_as(sql)
        .bind(user.get())
        .bind(target.get())
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

impl FollowRepository for SqliteStore {
    fn toggle_follow(
        &self,
        user: UserId,
        target: UserId,
    ) -> impl Future<Output = Result<Toggle, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move { Ok(toggle_follow(&pool, Edge::new(user, target)).await?) }
    }

    fn is_following(
        &self,
        user: UserId,
        target: UserId,
    ) -> impl Future<Output = Result<bool, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move { Ok(exists(&pool, EXISTS_FOLLOW, user, target).await?) }
    }

    fn list_following(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<RelatedUser>, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move { Ok(related_page(&pool, (COUNT_FOLLOWING, SELECT_FOLLOWING), user, page).await?) }
    }

    fn list_fans(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<RelatedUser>, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move { Ok(related_page(&pool, (COUNT_FANS, SELECT_FANS), user, page).await?) }
    }
}

impl BlacklistRepository for SqliteStore {
    fn toggle_block(
        &self,
        user: UserId,
        target: UserId,
    ) -> impl Future<Output = Result<Toggle, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move { Ok(toggle_block(&pool, user, target).await?) }
    }

    fn is_blocked(
        &self,
        user: UserId,
        target: UserId,
    ) -> impl Future<Output = Result<bool, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move { Ok(exists(&pool, EXISTS_BLOCK, user, target).await?) }
    }

    fn list_blocked(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<RelatedUser>, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move { Ok(related_page(&pool, (COUNT_BLOCKED, SELECT_BLOCKED), user, page).await?) }
    }
}
