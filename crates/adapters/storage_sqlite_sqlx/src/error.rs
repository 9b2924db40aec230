//! Storage-specific error type wrapping sqlx errors.

use community_domain::error::{CommunityError, ConflictError};

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Failed to serialize or deserialize a stored JSON value.
    #[error("JSON serialization error")]
    Json(#[from] serde_json::Error),

    /// Failed to run migrations.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StorageError {
    fn is_unique_violation(&self) -> bool {
        match self {
            Self::Database(sqlx::Error::Database(err)) => err.is_unique_violation(),
            _ => false,
        }
    }
}

impl From<StorageError> for CommunityError {
    fn from(err: StorageError) -> Self {
        // Services check uniqueness first; this only catches the race.
        if err.is_unique_violation() {
            return ConflictError::InvalidState("duplicate record").into();
        }
        Self::Storage(Box::new(err))
    }
}
