//! `SQLite` implementation of the activity trail ports: view history, shares, and search keywords.

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use community_app::ports::{HistoryRepository, SearchLogRepository, ShareRepository};
use community_domain::activity::{NewShare, PlatformCount, ShareStats};
use community_domain::error::CommunityError;
use community_domain::id::{PostId, UserId};
use community_domain::page::{PageRequest, Paged};
use community_domain::post::SavedPost;
use community_domain::time::Timestamp;

use crate::error::StorageError;
use crate::store::{Count, SqliteStore, Wrapper};

impl<'r> FromRow<'r, SqliteRow> for Wrapper<PlatformCount> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(PlatformCount {
            platform: row.try_get("platform")?,
            count: row.try_get("count")?,
        }))
    }
}

const UPSERT_VIEW: &str = "INSERT INTO view_history (user_id, post_id, createtime) VALUES (?, ?, ?) ON CONFLICT (user_id, post_id) DO UPDATE SET createtime = excluded.createtime";
const SELECT_HISTORY: &str = "SELECT p.id AS post_id, p.title, p.images, p.view_num, p.like_num, p.comment_num, p.createtime AS post_createtime, u.nickname, u.avatar, h.createtime AS saved_at FROM view_history h JOIN posts p ON p.id = h.post_id AND p.status = 'normal' LEFT JOIN users u ON u.id = p.user_id WHERE h.user_id = ? ORDER BY h.createtime DESC, h.id DESC LIMIT ? OFFSET ?";
const COUNT_HISTORY: &str = "SELECT COUNT(*) FROM view_history h JOIN posts p ON p.id = h.post_id AND p.status = 'normal' WHERE h.user_id = ?";
const CLEAR_HISTORY: &str = "DELETE FROM view_history WHERE user_id = ?";

const INSERT_SHARE: &str =
    "INSERT INTO share_log (user_id, post_id, platform, ip, createtime) VALUES (?, ?, ?, ?, ?)";
const INCREMENT_SHARES: &str = "UPDATE posts SET share_num = share_num + 1 WHERE id = ?";
const SELECT_SHARE_TOTAL: &str = "SELECT share_num FROM posts WHERE id = ?";
const SELECT_PLATFORMS: &str = "SELECT platform, COUNT(*) AS count FROM share_log WHERE post_id = ? GROUP BY platform ORDER BY count DESC, platform";

const UPSERT_KEYWORD: &str = "INSERT INTO search_log (user_id, keyword, createtime) VALUES (?, ?, ?) ON CONFLICT (user_id, keyword) DO UPDATE SET createtime = excluded.createtime";
const SELECT_KEYWORDS: &str = "SELECT keyword FROM search_log WHERE user_id = ? ORDER BY createtime DESC, id DESC LIMIT ?";
const CLEAR_KEYWORDS: &str = "DELETE FROM search_log WHERE user_id = ?";

impl HistoryRepository for SqliteStore {
    fn record_view(
        &self,
        user: UserId,
        post: PostId,
        at: Timestamp,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPSERT_VIEW)
                .bind(user.get())
                .bind(post.get())
                .bind(at.timestamp())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }

    fn list_history(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<SavedPost>, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let Count(total) = sqlx::query_as(COUNT_HISTORY)
                .bind(user.get())
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;
            let rows: Vec<Wrapper<SavedPost>> = sqlx::query_as(SELECT_HISTORY)
                .bind(user.get())
                .bind(page.limit())
                .bind(page.offset())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Paged::new(total, Wrapper::list(rows)))
        }
    }

    fn clear_history(
        &self,
        user: UserId,
    ) -> impl Future<Output = Result<u64, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(CLEAR_HISTORY)
                .bind(user.get())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(result.rows_affected())
        }
    }
}

async fn insert_share(pool: &SqlitePool, share: NewShare) -> Result<(), StorageError> {
    let mut tx = pool.begin().await?;
    sqlx::query(INSERT_SHARE)
        .bind(share.user_id.map(UserId::get))
        .bind(share.post_id.get())
        .bind(share.platform.as_deref())
        .bind(share.ip.as_deref())
        .bind(share.created_at.timestamp())
        .execute(&mut *tx)
        .await?;
    sqlx::query(INCREMENT_SHARES)
        .bind(share.post_id.get())
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

async fn share_stats(pool: &SqlitePool, post: PostId) -> Result<ShareStats, StorageError> {
    let total = sqlx::query_as::<_, Count>(SELECT_SHARE_TOTAL)
        .bind(post.get())
        .fetch_optional(pool)
        .await?
        .map_or(0, |Count(total)| total);
    let rows: Vec<Wrapper<PlatformCount>> = sqlx::query_as(SELECT_PLATFORMS)
        .bind(post.get())
        .fetch_all(pool)
        .await?;
    Ok(ShareStats {
        total,
        platforms: Wrapper::list(rows),
    })
}

impl ShareRepository for SqliteStore {
    fn record_share(
        &self,
        share: NewShare,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send {
        let pool = self.pool.clone();
        async move { Ok(insert_share(&pool, share).await?) }
    }

    fn share_stats(
        &self,
        post: PostId,
    ) -> impl Future<Output = Result<ShareStats, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move { Ok(share_stats(&pool, post).await?) }
    }
}

impl SearchLogRepository for SqliteStore {
    fn save_keyword(
        &self,
        user: UserId,
        keyword: String,
        at: Timestamp,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPSERT_KEYWORD)
                .bind(user.get())
                .bind(keyword)
                .bind(at.timestamp())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }

    fn recent_keywords(
        &self,
        user: UserId,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<String>, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<(String,)> = sqlx::query_as(SELECT_KEYWORDS)
                .bind(user.get())
                .bind(limit)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|(keyword,)| keyword).collect())
        }
    }

    fn clear_keywords(
        &self,
        user: UserId,
    ) -> impl Future<Output = Result<u64, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(CLEAR_KEYWORDS)
                .bind(user.get())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(result.rows_affected())
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use community_app::ports::PostRepository;
    use community_domain::time::now;

    use super::*;
    use crate::store::tests::{seed_post, seed_user, setup};

    #[tokio::test]
    async fn should_keep_one_history_row_per_post_and_refresh_its_time() {
        let store = setup().await;
        let user = seed_user(&store, "alice").await;
        let first = seed_post(&store, user, "First").await;
        let second = seed_post(&store, user, "Second").await;
        let earlier = now() - Duration::minutes(5);

        store.record_view(user, first, earlier).await.unwrap();
        store.record_view(user, second, earlier + Duration::minutes(1)).await.unwrap();
        store.record_view(user, first, now()).await.unwrap();

        let history = store.list_history(user, PageRequest::default()).await.unwrap();
        assert_eq!(history.total, 2);
        assert_eq!(history.list[0].post_id, first);
        assert_eq!(history.list[1].post_id, second);

        assert_eq!(store.clear_history(user).await.unwrap(), 2);
        let history = store.list_history(user, PageRequest::default()).await.unwrap();
        assert_eq!(history.total, 0);
    }

    #[tokio::test]
    async fn should_hide_history_of_hidden_posts() {
        let store = setup().await;
        let user = seed_user(&store, "alice").await;
        let post = seed_post(&store, user, "First").await;
        store.record_view(user, post, now()).await.unwrap();

        store.hide_post(post, now()).await.unwrap();

        let history = store.list_history(user, PageRequest::default()).await.unwrap();
        assert!(history.list.is_empty());
    }

    #[tokio::test]
    async fn should_count_shares_per_platform() {
        let store = setup().await;
        let user = seed_user(&store, "alice").await;
        let post = seed_post(&store, user, "First").await;
        for platform in [Some("wechat"), Some("wechat"), None] {
            store
                .record_share(NewShare {
                    post_id: post,
                    user_id: None,
                    platform: platform.map(str::to_string),
                    ip: Some("127.0.0.1".to_string()),
                    created_at: now(),
                })
                .await
                .unwrap();
        }

        let stats = store.share_stats(post).await.unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(
            stats.platforms[0],
            PlatformCount {
                platform: Some("wechat".to_string()),
                count: 2,
            }
        );
        assert_eq!(stats.platforms.len(), 2);
    }

    #[tokio::test]
    async fn should_dedupe_keywords_and_return_newest_first() {
        let store = setup().await;
        let user = seed_user(&store, "alice").await;
        let base = now() - Duration::minutes(10);

        store.save_keyword(user, "bike".to_string(), base).await.unwrap();
        store
            .save_keyword(user, "sofa".to_string(), base + Duration::minutes(1))
            .await
            .unwrap();
        store
            .save_keyword(user, "bike".to_string(), base + Duration::minutes(2))
            .await
            .unwrap();

        let keywords = store.recent_keywords(user, 10).await.unwrap();
        assert_eq!(keywords, vec!["bike".to_string(), "sofa".to_string()]);
        assert_eq!(store.recent_keywords(user, 1).await.unwrap().len(), 1);

        assert_eq!(store.clear_keywords(user).await.unwrap(), 2);
        assert!(store.recent_keywords(user, 10).await.unwrap().is_empty());
    }
}
