//! Comments under posts.

use axum::extract::State;
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

use community_app::ports::Store;
use community_domain::comment::{CommentView, NewComment};
use community_domain::id::{CommentId, PostId};
use community_domain::page::Paged;
use community_domain::time::now;

use crate::api::{ApiResult, IdBody, PageQuery};
use crate::auth::AuthUser;
use crate::envelope::Envelope;
use crate::extract::{Json, Query, client_ip};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub post_id: i64,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub post_id: i64,
}

#[derive(Debug, Serialize)]
pub struct Created {
    pub id: CommentId,
}

/// `POST /api/comment/create`
pub async fn create<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    headers: HeaderMap,
    Json(req): Json<CreateCommentRequest>,
) -> ApiResult<Created> {
    let id = state
        .comments
        .create(NewComment {
            post_id: PostId::new(req.post_id),
            user_id: user.id,
            content: req.content,
            ip: client_ip(&headers),
            created_at: now(),
        })
        .await?;
    Ok(Envelope::ok("commented", Created { id }))
}

/// `GET /api/comment/list`
pub async fn list<R: Store>(
    State(state): State<AppState<R>>,
    Query(query): Query<ListQuery>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Paged<CommentView>> {
    let comments = state
        .comments
        .list(PostId::new(query.post_id), page.into())
        .await?;
    Ok(Envelope::ok("ok", comments))
}

/// `POST /api/comment/delete`
pub async fn delete<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Json(body): Json<IdBody>,
) -> ApiResult<()> {
    state.comments.delete(CommentId::new(body.id), user.id).await?;
    Ok(Envelope::done("deleted"))
}
