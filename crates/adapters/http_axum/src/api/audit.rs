//! Post audits.

use std::str::FromStr;

use axum::extract::State;
use serde::Deserialize;

use community_app::ports::Store;
use community_domain::error::ValidationError;
use community_domain::id::PostId;
use community_domain::moderation::{AuditEntry, AuditStatus, ReviewDecision};
use community_domain::page::Paged;

use crate::api::{ApiResult, PageQuery, PostIdBody, non_blank};
use crate::auth::{AdminUser, AuthUser};
use crate::envelope::Envelope;
use crate::extract::{Json, Query};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    #[serde(default)]
    pub post_id: i64,
    pub status: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    #[serde(default)]
    pub post_id: i64,
}

/// `POST /api/audit/submit`
pub async fn submit<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Json(body): Json<PostIdBody>,
) -> ApiResult<()> {
    state
        .audits
        .submit(PostId::new(body.post_id), user.id)
        .await?;
    Ok(Envelope::done("submitted for review"))
}

/// `POST /api/audit/review`
pub async fn review<R: Store>(
    State(state): State<AppState<R>>,
    AdminUser(admin): AdminUser,
    Json(req): Json<ReviewRequest>,
) -> ApiResult<()> {
    let status = non_blank(req.status).ok_or(ValidationError::Required("status"))?;
    let decision = ReviewDecision::from_str(status.trim())?;
    state
        .audits
        .review(
            PostId::new(req.post_id),
            admin.id,
            decision,
            non_blank(req.reason),
        )
        .await?;
    Ok(Envelope::done("review recorded"))
}

/// `GET /api/audit/list`, pending audits unless `status` says otherwise.
pub async fn list<R: Store>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Query(query): Query<ListQuery>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Paged<AuditEntry>> {
    let status = match non_blank(query.status) {
        Some(raw) => AuditStatus::from_str(raw.trim())?,
        None => AuditStatus::Pending,
    };
    let audits = state.audits.list(status, page.into()).await?;
    Ok(Envelope::ok("ok", audits))
}

/// `GET /api/audit/detail`
pub async fn detail<R: Store>(
    State(state): State<AppState<R>>,
    _user: AuthUser,
    Query(query): Query<DetailQuery>,
) -> ApiResult<AuditEntry> {
    let audit = state.audits.detail(PostId::new(query.post_id)).await?;
    Ok(Envelope::ok("ok", audit))
}
