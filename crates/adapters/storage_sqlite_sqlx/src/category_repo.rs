//! `SQLite` implementation of [`CategoryRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use community_app::ports::CategoryRepository;
use community_domain::category::{Category, NewCategory};
use community_domain::error::CommunityError;
use community_domain::id::CategoryId;
use community_domain::status::Status;
use community_domain::time::Timestamp;

use crate::error::StorageError;
use crate::store::{Count, SqliteStore, Wrapper, parse, timestamp};

impl<'r> FromRow<'r, SqliteRow> for Wrapper<Category> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Category {
            id: CategoryId::new(row.try_get("id")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            image: row.try_get("image")?,
            sort: row.try_get("sort")?,
            post_count: row.try_get("post_count")?,
            status: parse(row, "status")?,
            created_at: timestamp(row, "createtime")?,
            updated_at: timestamp(row, "updatetime")?,
        }))
    }
}

const INSERT: &str = "INSERT INTO categories (name, description, image, sort, createtime, updatetime) VALUES (?, ?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM categories WHERE id = ?";
const SELECT_BY_NAME: &str = "SELECT * FROM categories WHERE name = ?";
const UPDATE: &str = "UPDATE categories SET name = ?, description = ?, image = ?, sort = ?, status = ?, updatetime = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM categories WHERE id = ?";
const COUNT_POSTS: &str = "SELECT COUNT(*) FROM posts WHERE category_id = ?";
const SELECT_BY_STATUS: &str =
    "SELECT * FROM categories WHERE status = ? ORDER BY sort DESC, id ASC";

impl CategoryRepository for SqliteStore {
    fn create_category(
        &self,
        category: NewCategory,
        at: Timestamp,
    ) -> impl Future<Output = Result<CategoryId, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(INSERT)
                .bind(category.name.trim())
                .bind(category.description.as_deref())
                .bind(category.image.as_deref())
                .bind(category.sort)
                .bind(at.timestamp())
                .bind(at.timestamp())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(CategoryId::new(result.last_insert_rowid()))
        }
    }

    fn find_category(
        &self,
        id: CategoryId,
    ) -> impl Future<Output = Result<Option<Category>, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper<Category>> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.get())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn find_category_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Category>, CommunityError>> + Send {
        let pool = self.pool.clone();
        let name = name.trim().to_string();
        async move {
            let row: Option<Wrapper<Category>> = sqlx::query_as(SELECT_BY_NAME)
                .bind(name)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn update_category(
        &self,
        category: Category,
        at: Timestamp,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPDATE)
                .bind(&category.name)
                .bind(category.description.as_deref())
                .bind(category.image.as_deref())
                .bind(category.sort)
                .bind(category.status.as_str())
                .bind(at.timestamp())
                .bind(category.id.get())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }

    fn delete_category(
        &self,
        id: CategoryId,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(DELETE_BY_ID)
                .bind(id.get())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }

    fn count_category_posts(
        &self,
        id: CategoryId,
    ) -> impl Future<Output = Result<i64, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let Count(count) = sqlx::query_as(COUNT_POSTS)
                .bind(id.get())
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(count)
        }
    }

    fn list_categories(
        &self,
        status: Status,
    ) -> impl Future<Output = Result<Vec<Category>, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper<Category>> = sqlx::query_as(SELECT_BY_STATUS)
                .bind(status.as_str())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::list(rows))
        }
    }
}
