//! Per-user block list.

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

#[derive(Debug, Deserialize)]
pub struct BlockTarget {
    #[serde(default)]
    pub block_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct BlockedByQuery {
    #[serde(default)]
    pub check_id: i64,
}

#[derive(Debug, Serialize)]
pub struct Blocked {
    pub blocked: bool,
}

#[derive(Debug, Serialize)]
pub struct IsBlocked {
    pub is_blocked: bool,
}

#[derive(Debug, Serialize)]
pub struct IsBlockedBy {
    pub is_blocked_by: bool,
}

/// `POST /api/blacklist/toggle`
pub async fn toggle<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Json(body): Json<BlockTarget>,
) -> ApiResult<Blocked> {
    let blocked = state
        .blacklist
        .toggle(user.id, UserId::new(body.block_id))
        .await?
        .is_on();
    let msg = if blocked { "blocked" } else { "unblocked" };
    Ok(Envelope::ok(msg, Blocked { blocked }))
}

/// `GET /api/blacklist/list`
pub async fn list<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Query(page): Query<PageQuery>,
) -> ApiResult<Paged<RelatedUser>> {
    let users = state.blacklist.list(user.id, page.into()).await?;
    Ok(Envelope::ok("ok", users))
}

/// `GET /api/blacklist/check`
pub async fn check<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Query(query): Query<BlockTarget>,
) -> ApiResult<IsBlocked> {
    let is_blocked = state
        .blacklist
        .check(user.id, UserId::new(query.block_id))
        .await?;
    Ok(Envelope::ok("ok", IsBlocked { is_blocked }))
}

/// `GET /api/blacklist/check_blocked`: whether `check_id` has blocked the caller.
pub async fn check_blocked<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Query(query): Query<BlockedByQuery>,
) -> ApiResult<IsBlockedBy> {
    let is_blocked_by = state
        .blacklist
        .check_blocked_by(user.id, UserId::new(query.check_id))
        .await?;
    Ok(Envelope::ok("ok", IsBlockedBy { is_blocked_by }))
}
