//! Registration, login and token renewal.

use axum::extract::State;
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

use community_app::ports::Store;
use community_domain::error::AuthError;
use community_domain::id::UserId;
use community_domain::time::now;
use community_domain::user::{Registration, UserInfo};

use crate::api::{ApiResult, non_blank};
use crate::auth::bearer_token;
use crate::envelope::Envelope;
use crate::extract::Json;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub mobile: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct Created {
    pub id: UserId,
}

#[derive(Debug, Serialize)]
pub struct LoginData {
    pub userinfo: UserInfo,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct TokenData {
    pub token: String,
}

/// `POST /api/user/register`
pub async fn register<R: Store>(
    State(state): State<AppState<R>>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Created> {
    let id = state
        .auth
        .register(Registration {
            username: req.username,
            password: req.password,
            mobile: non_blank(req.mobile),
        })
        .await?;
    Ok(Envelope::ok("registered", Created { id }))
}

/// `POST /api/user/login`
pub async fn login<R: Store>(
    State(state): State<AppState<R>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<LoginData> {
    let user = state.auth.login(&req.username, &req.password).await?;
    let token = state.tokens.issue(&user)?;
    Ok(Envelope::ok(
        "logged in",
        LoginData {
            userinfo: UserInfo::from(&user),
            token,
        },
    ))
}

/// `POST /api/token/refresh`
///
/// Re-issues a token that is valid, or expired within the grace window.
/// The account is reloaded so a disabled user cannot renew.
pub async fn refresh<R: Store>(
    State(state): State<AppState<R>>,
    headers: HeaderMap,
) -> ApiResult<TokenData> {
    let token = bearer_token(&headers).ok_or(AuthError::MissingToken)?;
    let claims = state.tokens.verify_for_refresh(token, now())?;
    let user = state.auth.active_user(UserId::new(claims.sub)).await?;
    let token = state.tokens.issue(&user)?;
    Ok(Envelope::ok("token refreshed", TokenData { token }))
}
