//! `SQLite` implementation of [`CatalogRepository`].
//!
//! Areas, versions, banners and communities have no write path in the
//! service; rows are loaded by operators directly.

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use community_app::ports::CatalogRepository;
use community_domain::catalog::{AppVersion, Area, Banner, Community};
use community_domain::error::CommunityError;

use crate::error::StorageError;
use crate::store::{SqliteStore, Wrapper, timestamp};

impl<'r> FromRow<'r, SqliteRow> for Wrapper<Area> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Area {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
        }))
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper<AppVersion> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(AppVersion {
            id: row.try_get("id")?,
            platform: row.try_get("platform")?,
            version: row.try_get("version")?,
            content: row.try_get("content")?,
            url: row.try_get("url")?,
            is_force: row.try_get("is_force")?,
            created_at: timestamp(row, "createtime")?,
        }))
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper<Banner> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Banner {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            image: row.try_get("image")?,
            url: row.try_get("url")?,
        }))
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper<Community> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Community {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            lat: row.try_get("lat")?,
            lng: row.try_get("lng")?,
        }))
    }
}

const SELECT_AREAS: &str = "SELECT id, name FROM areas WHERE pid = ? ORDER BY sort DESC, id ASC";
const SELECT_LATEST_VERSION: &str = "SELECT * FROM versions WHERE platform = ? AND status = 'normal' ORDER BY id DESC LIMIT 1";
// A negative LIMIT means no limit in SQLite.
const SELECT_BANNERS: &str =
    "SELECT * FROM banners WHERE status = 'normal' ORDER BY weigh DESC, id DESC LIMIT ?";
const SELECT_COMMUNITIES: &str =
    "SELECT * FROM communities WHERE status = 'normal' ORDER BY id ASC";

impl CatalogRepository for SqliteStore {
    fn list_areas(
        &self,
        parent: i64,
    ) -> impl Future<Output = Result<Vec<Area>, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper<Area>> = sqlx::query_as(SELECT_AREAS)
                .bind(parent)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::list(rows))
        }
    }

    fn latest_version(
        &self,
        platform: &str,
    ) -> impl Future<Output = Result<Option<AppVersion>, CommunityError>> + Send {
        let pool = self.pool.clone();
        let platform = platform.to_string();
        async move {
            let row: Option<Wrapper<AppVersion>> = sqlx::query_as(SELECT_LATEST_VERSION)
                .bind(platform)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn list_banners(
        &self,
        limit: Option<i64>,
    ) -> impl Future<Output = Result<Vec<Banner>, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper<Banner>> = sqlx::query_as(SELECT_BANNERS)
                .bind(limit.unwrap_or(-1))
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::list(rows))
        }
    }

    fn list_communities(
        &self,
    ) -> impl Future<Output = Result<Vec<Community>, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper<Community>> = sqlx::query_as(SELECT_COMMUNITIES)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::list(rows))
        }
    }
}
