//! `SQLite` implementation of [`AddressRepository`].
//!
//! At most one address per user carries `is_default`, and
//! `users.default_address_id` always mirrors it.

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqliteConnection, SqlitePool};

use community_app::ports::AddressRepository;
use community_domain::address::{Address, AddressForm};
use community_domain::error::CommunityError;
use community_domain::id::{AddressId, UserId};
use community_domain::time::Timestamp;

use crate::error::StorageError;
use crate::store::{SqliteStore, Wrapper, timestamp};

impl<'r> FromRow<'r, SqliteRow> for Wrapper<Address> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Address {
            id: AddressId::new(row.try_get("id")?),
            user_id: UserId::new(row.try_get("user_id")?),
            name: row.try_get("name")?,
            mobile: row.try_get("mobile")?,
            province: row.try_get("province")?,
            city: row.try_get("city")?,
            district: row.try_get("district")?,
            address: row.try_get("address")?,
            is_default: row.try_get("is_default")?,
            created_at: timestamp(row, "createtime")?,
            updated_at: timestamp(row, "updatetime")?,
        }))
    }
}

const SELECT_ALL: &str =
    "SELECT * FROM addresses WHERE user_id = ? ORDER BY is_default DESC, id DESC";
const SELECT_ONE: &str = "SELECT * FROM addresses WHERE id = ? AND user_id = ?";
const INSERT: &str = "INSERT INTO addresses (user_id, name, mobile, province, city, district, address, is_default, createtime, updatetime) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";
const UPDATE: &str = "UPDATE addresses SET name = ?, mobile = ?, province = ?, city = ?, district = ?, address = ?, is_default = ?, updatetime = ? WHERE id = ? AND user_id = ?";
const DELETE: &str = "DELETE FROM addresses WHERE id = ? AND user_id = ?";
const CLEAR_DEFAULTS: &str =
    "UPDATE addresses SET is_default = 0 WHERE user_id = ? AND id != ? AND is_default = 1";
const SET_USER_DEFAULT: &str = "UPDATE users SET default_address_id = ? WHERE id = ?";
const UNSET_USER_DEFAULT: &str =
    "UPDATE users SET default_address_id = NULL WHERE id = ? AND default_address_id = ?";

/// Point the user at `id` as default, or drop the pointer if it was `id`.
async fn sync_default(
    conn: &mut SqliteConnection,
    user: UserId,
    id: i64,
    is_default: bool,
) -> Result<(), sqlx::Error> {
    if is_default {
        sqlx::query(CLEAR_DEFAULTS)
            .bind(user.get())
            .bind(id)
            .execute(&mut *conn)
            .await?;
        sqlx::query(SET_USER_DEFAULT)
            .bind(id)
            .bind(user.get())
            .execute(&mut *conn)
            .await?;
    } else {
        sqlx::query(UNSET_USER_DEFAULT)
            .bind(user.get())
            .bind(id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

async fn insert(
    pool: &SqlitePool,
    user: UserId,
    form: AddressForm,
    at: Timestamp,
) -> Result<AddressId, StorageError> {
    let mut tx = pool.begin().await?;
    let id = sqlx::query(INSERT)
        .bind(user.get())
        .bind(&form.name)
        .bind(&form.mobile)
        .bind(&form.province)
        .bind(&form.city)
        .bind(&form.district)
        .bind(&form.address)
        .bind(form.is_default)
        .bind(at.timestamp())
        .bind(at.timestamp())
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();
    sync_default(&mut *tx, user, id, form.is_default).await?;
    tx.commit().await?;
    Ok(AddressId::new(id))
}

async fn update(
    pool: &SqlitePool,
    user: UserId,
    id: AddressId,
    form: AddressForm,
    at: Timestamp,
) -> Result<(), StorageError> {
    let mut tx = pool.begin().await?;
    let updated = sqlx::query(UPDATE)
        .bind(&form.name)
        .bind(&form.mobile)
        .bind(&form.province)
        .bind(&form.city)
        .bind(&form.district)
        .bind(&form.address)
        .bind(form.is_default)
        .bind(at.timestamp())
        .bind(id.get())
        .bind(user.get())
        .execute(&mut *tx)
        .await?
        .rows_affected();
    if updated == 1 {
        sync_default(&mut *tx, user, id.get(), form.is_default).await?;
    }
    tx.commit().await?;
    Ok(())
}

async fn delete(pool: &SqlitePool, user: UserId, id: AddressId) -> Result<(), StorageError> {
    let mut tx = pool.begin().await?;
    sqlx::query(DELETE)
        .bind(id.get())
        .bind(user.get())
        .execute(&mut *tx)
        .await?;
    sqlx::query(UNSET_USER_DEFAULT)
        .bind(user.get())
        .bind(id.get())
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

impl AddressRepository for SqliteStore {
    fn list_addresses(
        &self,
        user: UserId,
    ) -> impl Future<Output = Result<Vec<Address>, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper<Address>> = sqlx::query_as(SELECT_ALL)
                .bind(user.get())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::list(rows))
        }
    }

    fn find_address(
        &self,
        user: UserId,
        id: AddressId,
    ) -> impl Future<Output = Result<Option<Address>, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper<Address>> = sqlx::query_as(SELECT_ONE)
                .bind(id.get())
                .bind(user.get())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn create_address(
        &self,
        user: UserId,
        form: AddressForm,
        at: Timestamp,
    ) -> impl Future<Output = Result<AddressId, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move { Ok(insert(&pool, user, form, at).await?) }
    }

    fn update_address(
        &self,
        user: UserId,
        id: AddressId,
        form: AddressForm,
        at: Timestamp,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send {
        let pool = self.pool.clone();
        async move { Ok(update(&pool, user, id, form, at).await?) }
    }

    fn delete_address(
        &self,
        user: UserId,
        id: AddressId,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send {
        let pool = self.pool.clone();
        async move { Ok(delete(&pool, user, id).await?) }
    }
}
