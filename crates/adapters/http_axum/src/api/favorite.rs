//! Favorites: a user's saved posts.

use axum::extract::State;
use serde::{Deserialize, Serialize};

use community_app::ports::Store;
use community_domain::id::PostId;
use community_domain::page::Paged;
use community_domain::post::SavedPost;

use crate::api::{ApiResult, PageQuery, PostIdBody};
use crate::auth::AuthUser;
use crate::envelope::Envelope;
use crate::extract::{Json, Query};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckQuery {
    #[serde(default)]
    pub post_id: i64,
}

#[derive(Debug, Serialize)]
pub struct Favorited {
    pub favorited: bool,
}

#[derive(Debug, Serialize)]
pub struct IsFavorite {
    pub is_favorite: bool,
}

/// `POST /api/favorite/toggle`
pub async fn toggle<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Json(body): Json<PostIdBody>,
) -> ApiResult<Favorited> {
    let favorited = state
        .favorites
        .toggle(user.id, PostId::new(body.post_id))
        .await?
        .is_on();
    let msg = if favorited { "favorited" } else { "unfavorited" };
    Ok(Envelope::ok(msg, Favorited { favorited }))
}

/// `GET /api/favorite/list`
pub async fn list<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Query(page): Query<PageQuery>,
) -> ApiResult<Paged<SavedPost>> {
    let favorites = state.favorites.list(user.id, page.into()).await?;
    Ok(Envelope::ok("ok", favorites))
}

/// `GET /api/favorite/check`
pub async fn check<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Query(query): Query<CheckQuery>,
) -> ApiResult<IsFavorite> {
    let is_favorite = state
        .favorites
        .check(user.id, PostId::new(query.post_id))
        .await?;
    Ok(Envelope::ok("ok", IsFavorite { is_favorite }))
}
