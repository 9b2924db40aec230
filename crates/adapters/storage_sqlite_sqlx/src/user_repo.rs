//! `SQLite` implementation of [`UserRepository`] and [`VerificationCodeRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use community_app::ports::{UserRepository, VerificationCodeRepository};
use community_domain::error::CommunityError;
use community_domain::id::{AddressId, UserId};
use community_domain::time::Timestamp;
use community_domain::user::{NewUser, ProfileUpdate, User};
use community_domain::verification::{CodeEvent, VerificationCode};

use crate::error::StorageError;
use crate::store::{SqliteStore, Wrapper, parse, timestamp, timestamp_opt};

impl<'r> FromRow<'r, SqliteRow> for Wrapper<User> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let gender: i64 = row.try_get("gender")?;
        let default_address_id: Option<i64> = row.try_get("default_address_id")?;

        Ok(Self(User {
            id: UserId::new(row.try_get("id")?),
            username: row.try_get("username")?,
            nickname: row.try_get("nickname")?,
            password_hash: row.try_get("password")?,
            mobile: row.try_get("mobile")?,
            avatar: row.try_get("avatar")?,
            gender: u8::try_from(gender).unwrap_or_default(),
            bio: row.try_get("bio")?,
            score: row.try_get("score")?,
            follow_num: row.try_get("follow_num")?,
            fans_num: row.try_get("fans_num")?,
            default_address_id: default_address_id.map(AddressId::new),
            role: parse(row, "role")?,
            status: parse(row, "status")?,
            created_at: timestamp(row, "createtime")?,
            updated_at: timestamp(row, "updatetime")?,
            last_login_at: timestamp_opt(row, "last_login_time")?,
        }))
    }
}

const INSERT_USER: &str = "INSERT INTO users (username, nickname, password, mobile, createtime, updatetime) VALUES (?, ?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM users WHERE id = ?";
const SELECT_BY_USERNAME: &str = "SELECT * FROM users WHERE username = ?";
const SELECT_BY_MOBILE: &str = "SELECT * FROM users WHERE mobile = ?";
const UPDATE_PROFILE: &str = "UPDATE users SET nickname = ?, avatar = COALESCE(?, avatar), mobile = COALESCE(?, mobile), gender = COALESCE(?, gender), bio = COALESCE(?, bio), updatetime = ? WHERE id = ?";
const UPDATE_PASSWORD: &str = "UPDATE users SET password = ?, updatetime = ? WHERE id = ?";
const UPDATE_LOGIN: &str = "UPDATE users SET last_login_time = ? WHERE id = ?";

const INSERT_CODE: &str = "INSERT INTO sms_codes (mobile, event, code, expires_at, createtime) VALUES (?, ?, ?, ?, ?)";
const CONSUME_CODE: &str = "UPDATE sms_codes SET used = 1 WHERE id = (SELECT id FROM sms_codes WHERE mobile = ? AND event = ? AND code = ? AND used = 0 AND expires_at > ? ORDER BY id DESC LIMIT 1)";

impl UserRepository for SqliteStore {
    fn create_user(
        &self,
        user: NewUser,
    ) -> impl Future<Output = Result<UserId, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let at = user.created_at.timestamp();
            let result = sqlx::query(INSERT_USER)
                .bind(&user.username)
                .bind(&user.nickname)
                .bind(&user.password_hash)
                .bind(user.mobile.as_deref())
                .bind(at)
                .bind(at)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(UserId::new(result.last_insert_rowid()))
        }
    }

    fn find_user(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper<User>> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.get())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn find_user_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<User>, CommunityError>> + Send {
        let pool = self.pool.clone();
        let username = username.to_string();
        async move {
            let row: Option<Wrapper<User>> = sqlx::query_as(SELECT_BY_USERNAME)
                .bind(username)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn find_user_by_mobile(
        &self,
        mobile: &str,
    ) -> impl Future<Output = Result<Option<User>, CommunityError>> + Send {
        let pool = self.pool.clone();
        let mobile = mobile.to_string();
        async move {
            let row: Option<Wrapper<User>> = sqlx::query_as(SELECT_BY_MOBILE)
                .bind(mobile)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn update_profile(
        &self,
        id: UserId,
        update: ProfileUpdate,
        at: Timestamp,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPDATE_PROFILE)
                .bind(&update.nickname)
                .bind(update.avatar.as_deref())
                .bind(update.mobile.as_deref())
                .bind(update.gender.map(i64::from))
                .bind(update.bio.as_deref())
                .bind(at.timestamp())
                .bind(id.get())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }

    fn update_password(
        &self,
        id: UserId,
        password_hash: String,
        at: Timestamp,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPDATE_PASSWORD)
                .bind(password_hash)
                .bind(at.timestamp())
                .bind(id.get())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }

    fn record_login(
        &self,
        id: UserId,
        at: Timestamp,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPDATE_LOGIN)
                .bind(at.timestamp())
                .bind(id.get())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }
}

impl VerificationCodeRepository for SqliteStore {
    fn save_code(
        &self,
        code: VerificationCode,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let issued_at = community_domain::time::now().timestamp();
            sqlx::query(INSERT_CODE)
                .bind(&code.mobile)
                .bind(code.event.as_str())
                .bind(&code.code)
                .bind(code.expires_at.timestamp())
                .bind(issued_at)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }

    fn consume_code(
        &self,
        mobile: &str,
        event: CodeEvent,
        code: &str,
        now: Timestamp,
    ) -> impl Future<Output = Result<bool, CommunityError>> + Send {
        let pool = self.pool.clone();
        let mobile = mobile.to_string();
        let code = code.to_string();
        async move {
            let result = sqlx::query(CONSUME_CODE)
                .bind(mobile)
                .bind(event.as_str())
                .bind(code)
                .bind(now.timestamp())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(result.rows_affected() == 1)
        }
    }
}
