//! Post view history.

use axum::extract::State;
use serde::Serialize;

use community_app::ports::Store;
use community_domain::id::PostId;
use community_domain::page::Paged;
use community_domain::post::SavedPost;

use crate::api::{ApiResult, PageQuery, PostIdBody};
use crate::auth::AuthUser;
use crate::envelope::Envelope;
use crate::extract::{Json, Query};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Cleared {
    pub count: u64,
}

/// `POST /api/history/record`
pub async fn record<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Json(body): Json<PostIdBody>,
) -> ApiResult<()> {
    state
        .history
        .record(user.id, PostId::new(body.post_id))
        .await?;
    Ok(Envelope::done("recorded"))
}

/// `GET /api/history/list`
pub async fn list<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Query(page): Query<PageQuery>,
) -> ApiResult<Paged<SavedPost>> {
    let history = state.history.list(user.id, page.into()).await?;
    Ok(Envelope::ok("ok", history))
}

/// `POST /api/history/clear`
pub async fn clear<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
) -> ApiResult<Cleared> {
    let count = state.history.clear(user.id).await?;
    Ok(Envelope::ok("history cleared", Cleared { count }))
}
