//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`CommunityError`] via `#[from]`. Adapters map the variants onto their
//! own surface (HTTP status codes, log levels).

/// Top-level error shared by the domain, the application services and the adapters.
#[derive(Debug, thiserror::Error)]
pub enum CommunityError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error(transparent)]
    Unauthorized(#[from] AuthError),

    #[error(transparent)]
    Forbidden(#[from] ForbiddenError),

    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl CommunityError {
    /// Shorthand for a [`NotFoundError`] wrapped in a [`CommunityError`].
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound(NotFoundError {
            entity,
            id: id.to_string(),
        })
    }
}

/// A value supplied by a caller breaks an invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },

    #[error("file exceeds the {limit} bytes limit")]
    FileTooLarge { limit: u64 },
}

/// The addressed record does not exist, or is hidden.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} not found: {id}")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// The request collides with existing state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConflictError {
    #[error("{entity} already exists: {key}")]
    Duplicate { entity: &'static str, key: String },

    #[error("{0}")]
    InvalidState(&'static str),
}

/// The caller could not be authenticated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("authentication required")]
    MissingToken,

    #[error("invalid token")]
    InvalidToken,

    #[error("token expired")]
    ExpiredToken,

    #[error("wrong password")]
    WrongPassword,

    #[error("invalid or expired verification code")]
    InvalidCode,

    #[error("account disabled")]
    Disabled,
}

/// The caller is authenticated but not allowed to perform the action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ForbiddenError {
    #[error("{0} belongs to another user")]
    NotOwner(&'static str),

    #[error("administrator privileges required")]
    AdminRequired,

    #[error("one of the users has blocked the other")]
    Blocked,
}
