//! Admin-managed stick and recommend lists.
//!
//! Both lists share one service keyed by [`PinKind`]; the handlers below
//! only differ in the kind they pass and the names of their response fields.

use axum::extract::State;
use serde::{Deserialize, Serialize};

use community_app::ports::Store;
use community_domain::id::PostId;
use community_domain::moderation::{PinEntry, PinKind};
use community_domain::page::Paged;
use community_domain::time::from_unix;

use crate::api::{ApiResult, PageQuery};
use crate::auth::AdminUser;
use crate::envelope::Envelope;
use crate::extract::{Json, Query};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    #[serde(default)]
    pub post_id: i64,
    /// Unix seconds; absent or `0` pins without expiry.
    pub end_time: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CheckQuery {
    #[serde(default)]
    pub post_id: i64,
}

#[derive(Debug, Serialize)]
pub struct Sticky {
    pub sticky: bool,
}

#[derive(Debug, Serialize)]
pub struct Recommended {
    pub recommended: bool,
}

#[derive(Debug, Serialize)]
pub struct IsStick {
    pub is_stick: bool,
}

#[derive(Debug, Serialize)]
pub struct IsRecommend {
    pub is_recommend: bool,
}

async fn toggle<R: Store>(
    state: &AppState<R>,
    kind: PinKind,
    admin: &AdminUser,
    req: ToggleRequest,
) -> Result<bool, crate::error::ApiError> {
    let end_time = req.end_time.filter(|secs| *secs > 0).map(from_unix);
    let toggle = state
        .pins
        .toggle(kind, PostId::new(req.post_id), admin.0.id, end_time)
        .await?;
    Ok(toggle.is_on())
}

/// `POST /api/stick/toggle`
pub async fn toggle_stick<R: Store>(
    State(state): State<AppState<R>>,
    admin: AdminUser,
    Json(req): Json<ToggleRequest>,
) -> ApiResult<Sticky> {
    let sticky = toggle(&state, PinKind::Stick, &admin, req).await?;
    let msg = if sticky { "post pinned" } else { "post unpinned" };
    Ok(Envelope::ok(msg, Sticky { sticky }))
}

/// `GET /api/stick/list`
pub async fn list_sticks<R: Store>(
    State(state): State<AppState<R>>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Paged<PinEntry>> {
    let entries = state.pins.list(PinKind::Stick, page.into()).await?;
    Ok(Envelope::ok("ok", entries))
}

/// `GET /api/stick/check`
pub async fn check_stick<R: Store>(
    State(state): State<AppState<R>>,
    Query(query): Query<CheckQuery>,
) -> ApiResult<IsStick> {
    let is_stick = state
        .pins
        .check(PinKind::Stick, PostId::new(query.post_id))
        .await?;
    Ok(Envelope::ok("ok", IsStick { is_stick }))
}

/// `POST /api/recommend/toggle`
pub async fn toggle_recommend<R: Store>(
    State(state): State<AppState<R>>,
    admin: AdminUser,
    Json(req): Json<ToggleRequest>,
) -> ApiResult<Recommended> {
    let recommended = toggle(&state, PinKind::Recommend, &admin, req).await?;
    let msg = if recommended {
        "post recommended"
    } else {
        "recommendation removed"
    };
    Ok(Envelope::ok(msg, Recommended { recommended }))
}

/// `GET /api/recommend/list`
pub async fn list_recommends<R: Store>(
    State(state): State<AppState<R>>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Paged<PinEntry>> {
    let entries = state.pins.list(PinKind::Recommend, page.into()).await?;
    Ok(Envelope::ok("ok", entries))
}

/// `GET /api/recommend/check`
pub async fn check_recommend<R: Store>(
    State(state): State<AppState<R>>,
    Query(query): Query<CheckQuery>,
) -> ApiResult<IsRecommend> {
    let is_recommend = state
        .pins
        .check(PinKind::Recommend, PostId::new(query.post_id))
        .await?;
    Ok(Envelope::ok("ok", IsRecommend { is_recommend }))
}
