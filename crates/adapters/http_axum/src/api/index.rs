//! Home screen feeds.

use axum::extract::State;
use serde::Serialize;

use community_app::ports::Store;
use community_domain::catalog::{Banner, HomeFeed};
use community_domain::category::Category;

use crate::api::ApiResult;
use crate::envelope::Envelope;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct List<T> {
    pub list: Vec<T>,
}

/// `GET /api/index/init`: banners, categories and the latest posts.
pub async fn init<R: Store>(State(state): State<AppState<R>>) -> ApiResult<HomeFeed> {
    let feed = state.catalog.home().await?;
    Ok(Envelope::ok("ok", feed))
}

/// `GET /api/index/categories`
pub async fn categories<R: Store>(
    State(state): State<AppState<R>>,
) -> ApiResult<List<Category>> {
    let list = state.catalog.categories().await?;
    Ok(Envelope::ok("ok", List { list }))
}

/// `GET /api/index/banners`
pub async fn banners<R: Store>(State(state): State<AppState<R>>) -> ApiResult<List<Banner>> {
    let list = state.catalog.banners().await?;
    Ok(Envelope::ok("ok", List { list }))
}
