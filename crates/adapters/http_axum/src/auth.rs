//! Token issuing and the extractors that expose the caller to handlers.
//!
//! Tokens are HS256 JWTs sent as `Authorization: Bearer <token>` or as a
//! bare `token` header. Share links carry their own short JWT, signed with
//! the same secret but distinguished by `kind`.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;
use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use community_domain::error::{AuthError, CommunityError, ForbiddenError};
use community_domain::id::{PostId, UserId};
use community_domain::time::{Timestamp, now};
use community_domain::user::{User, UserRole};

use crate::error::ApiError;

const ALGORITHM: Algorithm = Algorithm::HS256;
const SHARE_KIND: &str = "share";

/// Claims of a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}

/// Claims of a share link token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareClaims {
    pub post_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    pub kind: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    Invalid(#[source] jsonwebtoken::errors::Error),
    #[error("token is not a {0} token")]
    WrongKind(&'static str),
    #[error("failed to sign token")]
    Sign(#[source] jsonwebtoken::errors::Error),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Invalid(err),
        }
    }
}

impl From<TokenError> for CommunityError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AuthError::ExpiredToken.into(),
            TokenError::Invalid(_) | TokenError::WrongKind(_) => AuthError::InvalidToken.into(),
            TokenError::Sign(_) => Self::Storage(Box::new(err)),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        Self::Domain(err.into())
    }
}

/// Signing material and lifetimes for every token the service hands out.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    token_ttl: Duration,
    refresh_grace: Duration,
    share_ttl: Duration,
}

impl TokenKeys {
    #[must_use]
    pub fn new(
        secret: &[u8],
        token_ttl: Duration,
        refresh_grace: Duration,
        share_ttl: Duration,
    ) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            token_ttl,
            refresh_grace,
            share_ttl,
        }
    }

    /// # Errors
    ///
    /// Returns [`TokenError::Sign`] when encoding fails.
    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        self.issue_at(user, now())
    }

    fn issue_at(&self, user: &User, at: Timestamp) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user.id.get(),
            username: user.username.clone(),
            role: user.role,
            iat: at.timestamp(),
            exp: (at + self.token_ttl).timestamp(),
        };
        encode(&Header::new(ALGORITHM), &claims, &self.encoding).map_err(TokenError::Sign)
    }

    /// Verify a session token, rejecting expired ones.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Expired`] or [`TokenError::Invalid`].
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        Ok(decode::<Claims>(token, &self.decoding, &validation)?.claims)
    }

    /// Verify a session token for renewal: an expired token is still
    /// accepted while its `exp` lies within the refresh grace window.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Expired`] once the grace window has passed, or
    /// [`TokenError::Invalid`] on a bad signature or malformed token.
    pub fn verify_for_refresh(&self, token: &str, at: Timestamp) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        let claims = decode::<Claims>(token, &self.decoding, &validation)?.claims;
        if claims.exp + self.refresh_grace.num_seconds() < at.timestamp() {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }

    /// # Errors
    ///
    /// Returns [`TokenError::Sign`] when encoding fails.
    pub fn share_token(&self, post: PostId, user: Option<UserId>) -> Result<String, TokenError> {
        let at = now();
        let claims = ShareClaims {
            post_id: post.get(),
            user_id: user.map(UserId::get),
            kind: SHARE_KIND.to_string(),
            iat: at.timestamp(),
            exp: (at + self.share_ttl).timestamp(),
        };
        encode(&Header::new(ALGORITHM), &claims, &self.encoding).map_err(TokenError::Sign)
    }

    /// # Errors
    ///
    /// Returns a [`TokenError`] when the token is expired, forged, or not a
    /// share token.
    pub fn verify_share(&self, token: &str) -> Result<ShareClaims, TokenError> {
        let validation = Validation::new(ALGORITHM);
        let claims = decode::<ShareClaims>(token, &self.decoding, &validation)?.claims;
        if claims.kind != SHARE_KIND {
            return Err(TokenError::WrongKind(SHARE_KIND));
        }
        Ok(claims)
    }
}

/// Token carried by the request, from `Authorization: Bearer` or `token`.
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let from_authorization = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));
    let from_token = headers
        .get("token")
        .and_then(|value| value.to_str().ok());

    from_authorization
        .or(from_token)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// The authenticated caller. Rejects with 401 when no valid token is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: UserId,
    pub username: String,
    pub role: UserRole,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: UserId::new(claims.sub),
            username: claims.username,
            role: claims.role,
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    Arc<TokenKeys>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = Arc::<TokenKeys>::from_ref(state);
        let token = bearer_token(&parts.headers).ok_or(AuthError::MissingToken)?;
        let claims = keys.verify(token)?;
        Ok(Self::from(claims))
    }
}

/// The caller when a valid token is present; anonymous otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaybeUser(pub Option<AuthUser>);

impl MaybeUser {
    #[must_use]
    pub fn id(&self) -> Option<UserId> {
        self.0.as_ref().map(|user| user.id)
    }
}

impl<S> FromRequestParts<S> for MaybeUser
where
    Arc<TokenKeys>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(AuthUser::from_request_parts(parts, state).await.ok()))
    }
}

/// An authenticated administrator. Rejects with 403 for other roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminUser(pub AuthUser);

impl<S> FromRequestParts<S> for AdminUser
where
    Arc<TokenKeys>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.role.is_admin() {
            return Err(CommunityError::from(ForbiddenError::AdminRequired).into());
        }
        Ok(Self(user))
    }
}
