//! The caller's own account: profile, password, posts and favorites.

use std::str::FromStr;

use axum::extract::State;
use serde::Deserialize;

use community_app::ports::Store;
use community_domain::page::Paged;
use community_domain::post::{PostView, SavedPost};
use community_domain::user::{ProfileUpdate, User};
use community_domain::verification::CodeEvent;

use crate::api::{ApiResult, PageQuery, non_blank};
use crate::auth::AuthUser;
use crate::envelope::Envelope;
use crate::extract::{Json, Query};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub nickname: String,
    pub avatar: Option<String>,
    pub mobile: Option<String>,
    pub gender: Option<u8>,
    pub bio: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub oldpassword: String,
    #[serde(default)]
    pub newpassword: String,
}

#[derive(Debug, Deserialize)]
pub struct SendCodeRequest {
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub event: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub password: String,
}

/// `GET /api/user/profile`
pub async fn profile<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
) -> ApiResult<User> {
    let profile = state.users.profile(user.id).await?;
    Ok(Envelope::ok("ok", profile))
}

/// `POST /api/user/update`
pub async fn update<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<()> {
    state
        .users
        .update_profile(
            user.id,
            ProfileUpdate {
                nickname: req.nickname,
                avatar: non_blank(req.avatar),
                mobile: non_blank(req.mobile),
                gender: req.gender,
                bio: req.bio,
            },
        )
        .await?;
    Ok(Envelope::done("profile updated"))
}

/// `POST /api/user/change_password`
pub async fn change_password<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<()> {
    state
        .users
        .change_password(user.id, &req.oldpassword, &req.newpassword)
        .await?;
    Ok(Envelope::done("password changed"))
}

/// `POST /api/user/send_code`
pub async fn send_code<R: Store>(
    State(state): State<AppState<R>>,
    Json(req): Json<SendCodeRequest>,
) -> ApiResult<()> {
    let event = CodeEvent::from_str(&req.event)?;
    state.users.send_code(req.mobile.trim(), event).await?;
    Ok(Envelope::done("code sent"))
}

/// `POST /api/user/reset_password`
pub async fn reset_password<R: Store>(
    State(state): State<AppState<R>>,
    Json(req): Json<ResetPasswordRequest>,
) -> ApiResult<()> {
    state
        .users
        .reset_password(req.mobile.trim(), &req.code, &req.password)
        .await?;
    Ok(Envelope::done("password reset"))
}

/// `GET /api/user/posts`
pub async fn my_posts<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Query(page): Query<PageQuery>,
) -> ApiResult<Paged<PostView>> {
    let posts = state.posts.list_by_author(user.id, page.into()).await?;
    Ok(Envelope::ok("ok", posts))
}

/// `GET /api/user/favorites`
pub async fn my_favorites<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Query(page): Query<PageQuery>,
) -> ApiResult<Paged<SavedPost>> {
    let favorites = state.favorites.list(user.id, page.into()).await?;
    Ok(Envelope::ok("ok", favorites))
}
