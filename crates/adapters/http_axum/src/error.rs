//! HTTP error response mapping.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use community_domain::error::{AuthError, CommunityError, ValidationError};

use crate::envelope::Failure;

/// Maps [`CommunityError`] and request rejections to an error envelope
/// with the matching HTTP status.
#[derive(Debug)]
pub enum ApiError {
    Domain(CommunityError),
    /// The request could not be decoded at all.
    BadRequest(String),
    /// A rejection that carries its own status, such as an oversized body.
    Rejected { status: StatusCode, reason: String },
    /// No route matched.
    NoRoute,
}

impl From<CommunityError> for ApiError {
    fn from(err: CommunityError) -> Self {
        Self::Domain(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Domain(err.into())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::Domain(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::Rejected {
            status: err.status(),
            reason: err.body_text(),
        }
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Domain(CommunityError::Validation(_)) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Domain(CommunityError::NotFound(_)) | Self::NoRoute => StatusCode::NOT_FOUND,
            Self::Domain(CommunityError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Domain(CommunityError::Unauthorized(_)) => StatusCode::UNAUTHORIZED,
            Self::Domain(CommunityError::Forbidden(_)) => StatusCode::FORBIDDEN,
            Self::Domain(CommunityError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Rejected { status, .. } => *status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Domain(CommunityError::Storage(err)) => {
                tracing::error!(error = %err, "storage error");
                "internal server error".to_string()
            }
            Self::Domain(err) => err.to_string(),
            Self::BadRequest(reason) | Self::Rejected { reason, .. } => reason.clone(),
            Self::NoRoute => "route not found".to_string(),
        };

        (status, Json(Failure::new(&message))).into_response()
    }
}

/// Fallback for unmatched routes so they answer with the envelope too.
pub async fn no_route() -> ApiError {
    ApiError::NoRoute
}
