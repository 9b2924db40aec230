//! `SQLite` implementation of [`SettingRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use community_app::ports::SettingRepository;
use community_domain::error::CommunityError;
use community_domain::id::SettingId;
use community_domain::setting::{NewSetting, Setting, SettingValue};
use community_domain::time::Timestamp;

use crate::error::StorageError;
use crate::store::{SqliteStore, Wrapper, parse, timestamp};

impl<'r> FromRow<'r, SqliteRow> for Wrapper<Setting> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Setting {
            id: SettingId::new(row.try_get("id")?),
            name: row.try_get("name")?,
            group: row.try_get("group")?,
            title: row.try_get("title")?,
            tip: row.try_get("tip")?,
            kind: row.try_get("type")?,
            value: row.try_get("value")?,
            sort: row.try_get("sort")?,
            status: parse(row, "status")?,
            created_at: timestamp(row, "createtime")?,
            updated_at: timestamp(row, "updatetime")?,
        }))
    }
}

const SELECT: &str = r#"SELECT * FROM configs WHERE (?1 IS NULL OR "group" = ?1) ORDER BY sort DESC, id ASC"#;
const SELECT_BY_NAME: &str = "SELECT * FROM configs WHERE name = ?";
const INSERT: &str = r#"INSERT INTO configs (name, "group", title, tip, type, value, sort, createtime, updatetime) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#;
const UPDATE_VALUE: &str = "UPDATE configs SET value = ?, updatetime = ? WHERE name = ?";
const DELETE_BY_NAME: &str = "DELETE FROM configs WHERE name = ?";

async fn update_values(
    pool: &SqlitePool,
    values: Vec<SettingValue>,
    at: Timestamp,
) -> Result<u64, StorageError> {
    let mut tx = pool.begin().await?;
    let mut changed = 0;
    for item in values {
        let result = sqlx::query(UPDATE_VALUE)
            .bind(item.value)
            .bind(at.timestamp())
            .bind(item.name)
            .execute(&mut *tx)
            .await?;
        changed += result.rows_affected();
    }
    tx.commit().await?;
    Ok(changed)
}

impl SettingRepository for SqliteStore {
    fn list_settings(
        &self,
        group: Option<String>,
    ) -> impl Future<Output = Result<Vec<Setting>, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper<Setting>> = sqlx::query_as(SELECT)
                .bind(group)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::list(rows))
        }
    }

    fn find_setting(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Setting>, CommunityError>> + Send {
        let pool = self.pool.clone();
        let name = name.to_string();
        async move {
            let row: Option<Wrapper<Setting>> = sqlx::query_as(SELECT_BY_NAME)
                .bind(name)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn create_setting(
        &self,
        setting: NewSetting,
        at: Timestamp,
    ) -> impl Future<Output = Result<SettingId, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(INSERT)
                .bind(setting.name)
                .bind(setting.group)
                .bind(setting.title)
                .bind(setting.tip)
                .bind(setting.kind)
                .bind(setting.value)
                .bind(setting.sort)
                .bind(at.timestamp())
                .bind(at.timestamp())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(SettingId::new(result.last_insert_rowid()))
        }
    }

    fn update_setting_values(
        &self,
        values: Vec<SettingValue>,
        at: Timestamp,
    ) -> impl Future<Output = Result<u64, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move { Ok(update_values(&pool, values, at).await?) }
    }

    fn delete_setting(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<bool, CommunityError>> + Send {
        let pool = self.pool.clone();
        let name = name.to_string();
        async move {
            let result = sqlx::query(DELETE_BY_NAME)
                .bind(name)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(result.rows_affected() > 0)
        }
    }
}
