//! Share links and share tracking.

use axum::extract::State;
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

use community_app::ports::Store;
use community_domain::activity::{NewShare, ShareStats};
use community_domain::error::ValidationError;
use community_domain::id::PostId;
use community_domain::time::now;

use crate::api::{ApiResult, non_blank};
use crate::auth::MaybeUser;
use crate::envelope::Envelope;
use crate::extract::{Json, Query, client_ip};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecordRequest {
    #[serde(default)]
    pub post_id: i64,
    pub platform: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PostIdQuery {
    #[serde(default)]
    pub post_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct Link {
    pub link: String,
}

/// Where a share link points, and who shared it.
#[derive(Debug, Serialize)]
pub struct Resolved {
    pub post_id: i64,
    pub user_id: Option<i64>,
}

/// `GET /api/share/link`
pub async fn link<R: Store>(
    State(state): State<AppState<R>>,
    viewer: MaybeUser,
    Query(query): Query<PostIdQuery>,
) -> ApiResult<Link> {
    let post = state
        .shares
        .shareable_post(PostId::new(query.post_id))
        .await?;
    let token = state.tokens.share_token(post.id, viewer.id())?;
    let link = format!("{}/share/{token}", state.share_base_url);
    Ok(Envelope::ok("ok", Link { link }))
}

/// `POST /api/share/record`
pub async fn record<R: Store>(
    State(state): State<AppState<R>>,
    viewer: MaybeUser,
    headers: HeaderMap,
    Json(req): Json<RecordRequest>,
) -> ApiResult<()> {
    state
        .shares
        .record(NewShare {
            post_id: PostId::new(req.post_id),
            user_id: viewer.id(),
            platform: non_blank(req.platform),
            ip: client_ip(&headers),
            created_at: now(),
        })
        .await?;
    Ok(Envelope::done("share recorded"))
}

/// `GET /api/share/resolve`, the target of a `/share/<token>` link.
pub async fn resolve<R: Store>(
    State(state): State<AppState<R>>,
    Query(query): Query<TokenQuery>,
) -> ApiResult<Resolved> {
    let token = query.token.trim();
    if token.is_empty() {
        return Err(ValidationError::Required("token").into());
    }
    let claims = state.tokens.verify_share(token)?;
    let post = state
        .shares
        .shareable_post(PostId::new(claims.post_id))
        .await?;
    Ok(Envelope::ok(
        "ok",
        Resolved {
            post_id: post.id.get(),
            user_id: claims.user_id,
        },
    ))
}

/// `GET /api/share/stats`
pub async fn stats<R: Store>(
    State(state): State<AppState<R>>,
    Query(query): Query<PostIdQuery>,
) -> ApiResult<ShareStats> {
    let stats = state.shares.stats(PostId::new(query.post_id)).await?;
    Ok(Envelope::ok("ok", stats))
}
