//! Tags and post tagging.

use std::str::FromStr;

use axum::extract::State;
use serde::{Deserialize, Serialize};

use community_app::ports::Store;
use community_domain::id::{PostId, TagId};
use community_domain::page::Paged;
use community_domain::tag::{Tag, TagSort};

use crate::api::{ApiResult, IdBody, PageQuery, non_blank};
use crate::auth::{AdminUser, AuthUser};
use crate::envelope::Envelope;
use crate::extract::{Json, Query};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTagRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub sort_by: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HotQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PostQuery {
    #[serde(default)]
    pub post_id: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SetPostTagsRequest {
    pub post_id: i64,
    pub tag_ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct Created {
    pub id: TagId,
}

#[derive(Debug, Serialize)]
pub struct Tags {
    pub list: Vec<Tag>,
}

/// `POST /api/tag/create`
pub async fn create<R: Store>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Json(req): Json<CreateTagRequest>,
) -> ApiResult<Created> {
    let id = state.tags.create(&req.name).await?;
    Ok(Envelope::ok("tag created", Created { id }))
}

/// `POST /api/tag/delete`
pub async fn delete<R: Store>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Json(body): Json<IdBody>,
) -> ApiResult<()> {
    state.tags.delete(TagId::new(body.id)).await?;
    Ok(Envelope::done("tag deleted"))
}

/// `GET /api/tag/list`
pub async fn list<R: Store>(
    State(state): State<AppState<R>>,
    Query(query): Query<ListQuery>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Paged<Tag>> {
    let sort = match non_blank(query.sort_by) {
        Some(raw) => TagSort::from_str(raw.trim())?,
        None => TagSort::default(),
    };
    let tags = state.tags.list(sort, page.into()).await?;
    Ok(Envelope::ok("ok", tags))
}

/// `GET /api/tag/hot`
pub async fn hot<R: Store>(
    State(state): State<AppState<R>>,
    Query(query): Query<HotQuery>,
) -> ApiResult<Tags> {
    let list = state.tags.hot(query.limit).await?;
    Ok(Envelope::ok("ok", Tags { list }))
}

/// `GET /api/tag/by_post`
pub async fn by_post<R: Store>(
    State(state): State<AppState<R>>,
    Query(query): Query<PostQuery>,
) -> ApiResult<Tags> {
    let list = state.tags.by_post(PostId::new(query.post_id)).await?;
    Ok(Envelope::ok("ok", Tags { list }))
}

/// `POST /api/tag/set_post_tags`
pub async fn set_post_tags<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Json(req): Json<SetPostTagsRequest>,
) -> ApiResult<()> {
    let tags = req.tag_ids.into_iter().map(TagId::new).collect();
    state
        .tags
        .set_post_tags(PostId::new(req.post_id), user.id, tags)
        .await?;
    Ok(Envelope::done("tags updated"))
}
