//! Per-user search keyword history.

use axum::extract::State;
use serde::{Deserialize, Serialize};

use community_app::ports::Store;

use crate::api::ApiResult;
use crate::auth::AuthUser;
use crate::envelope::Envelope;
use crate::extract::{Json, Query};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    #[serde(default)]
    pub keyword: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct Keywords {
    pub list: Vec<String>,
}

/// `POST /api/search/save_log`
pub async fn save_log<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Json(req): Json<SaveRequest>,
) -> ApiResult<()> {
    state.search.save(user.id, &req.keyword).await?;
    Ok(Envelope::done("saved"))
}

/// `GET /api/search/history`
pub async fn history<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Keywords> {
    let list = state.search.history(user.id, query.limit).await?;
    Ok(Envelope::ok("ok", Keywords { list }))
}

/// `POST /api/search/clear`
pub async fn clear<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
) -> ApiResult<()> {
    state.search.clear(user.id).await?;
    Ok(Envelope::done("search history cleared"))
}
