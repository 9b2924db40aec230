//! The [`SqliteStore`] handle and the row-decoding helpers shared by every repository.

use std::error::Error;
use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use community_domain::time::{Timestamp, from_unix};

/// `SQLite`-backed implementation of every repository port.
///
/// Cloning is cheap: clones share the same connection pool.
#[derive(Clone)]
pub struct SqliteStore {
    pub(crate) pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new store using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Wrapper for converting database rows into domain types.
pub(crate) struct Wrapper<T>(pub(crate) T);

impl<T> Wrapper<T> {
    pub(crate) fn maybe(value: Option<Self>) -> Option<T> {
        value.map(|w| w.0)
    }

    pub(crate) fn list(values: Vec<Self>) -> Vec<T> {
        values.into_iter().map(|w| w.0).collect()
    }
}

/// Parse a stored text column through the domain `FromStr` impl.
pub(crate) fn parse<T>(row: &SqliteRow, column: &str) -> Result<T, sqlx::Error>
where
    T: FromStr,
    T::Err: Error + Send + Sync + 'static,
{
    let value: String = row.try_get(column)?;
    T::from_str(&value).map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

pub(crate) fn timestamp(row: &SqliteRow, column: &str) -> Result<Timestamp, sqlx::Error> {
    let secs: i64 = row.try_get(column)?;
    Ok(from_unix(secs))
}

pub(crate) fn timestamp_opt(
    row: &SqliteRow,
    column: &str,
) -> Result<Option<Timestamp>, sqlx::Error> {
    let secs: Option<i64> = row.try_get(column)?;
    Ok(secs.map(from_unix))
}

/// Decode a JSON array of image URLs.
pub(crate) fn images(row: &SqliteRow, column: &str) -> Result<Vec<String>, sqlx::Error> {
    let raw: Option<String> = row.try_get(column)?;
    match raw.as_deref() {
        None | Some("") => Ok(Vec::new()),
        Some(raw) => serde_json::from_str(raw).map_err(|err| sqlx::Error::Decode(Box::new(err))),
    }
}

pub(crate) fn encode_images(images: &[String]) -> Result<String, serde_json::Error> {
    serde_json::to_string(images)
}

/// Escape `LIKE` wildcards and wrap the keyword for a substring match.
pub(crate) fn like_pattern(keyword: &str) -> String {
    let escaped = keyword
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Decode a single `COUNT(*)` column.
pub(crate) struct Count(pub(crate) i64);

impl<'r> FromRow<'r, SqliteRow> for Count {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(row.try_get(0)?))
    }
}
