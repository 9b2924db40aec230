//! Follow graph between users.

use axum::extract::State;
use serde::{Deserialize, Serialize};

use community_app::ports::Store;
use community_domain::id::UserId;
use community_domain::page::Paged;
use community_domain::user::RelatedUser;

use crate::api::{ApiResult, PageQuery};
use crate::auth::AuthUser;
use crate::envelope::Envelope;
use crate::extract::{Json, Query};
use crate::state::AppState;

/// Used both as the toggle body and the check query.
#[derive(Debug, Deserialize)]
pub struct FollowTarget {
    #[serde(default)]
    pub follow_id: i64,
}

#[derive(Debug, Serialize)]
pub struct Followed {
    pub followed: bool,
}

#[derive(Debug, Serialize)]
pub struct IsFollow {
    pub is_follow: bool,
}

/// `POST /api/follow/toggle`
pub async fn toggle<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Json(body): Json<FollowTarget>,
) -> ApiResult<Followed> {
    let followed = state
        .follows
        .toggle(user.id, UserId::new(body.follow_id))
        .await?
        .is_on();
    let msg = if followed { "followed" } else { "unfollowed" };
    Ok(Envelope::ok(msg, Followed { followed }))
}

/// `GET /api/follow/follow_list`
pub async fn follow_list<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Query(page): Query<PageQuery>,
) -> ApiResult<Paged<RelatedUser>> {
    let users = state.follows.following(user.id, page.into()).await?;
    Ok(Envelope::ok("ok", users))
}

/// `GET /api/follow/fans_list`
pub async fn fans_list<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Query(page): Query<PageQuery>,
) -> ApiResult<Paged<RelatedUser>> {
    let users = state.follows.fans(user.id, page.into()).await?;
    Ok(Envelope::ok("ok", users))
}

/// `GET /api/follow/check`
pub async fn check<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Query(query): Query<FollowTarget>,
) -> ApiResult<IsFollow> {
    let is_follow = state
        .follows
        .check(user.id, UserId::new(query.follow_id))
        .await?;
    Ok(Envelope::ok("ok", IsFollow { is_follow }))
}
