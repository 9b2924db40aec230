//! Category administration and lookup.

use std::str::FromStr;

use axum::extract::State;
use serde::{Deserialize, Serialize};

use community_app::ports::Store;
use community_domain::category::{Category, CategoryPatch, NewCategory};
use community_domain::error::ValidationError;
use community_domain::id::CategoryId;
use community_domain::status::Status;

use crate::api::{ApiResult, IdBody, non_blank};
use crate::auth::AdminUser;
use crate::envelope::Envelope;
use crate::extract::{Json, Query};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub sort: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateCategoryRequest {
    pub id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub sort: Option<i64>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    #[serde(default)]
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct Created {
    pub id: CategoryId,
}

#[derive(Debug, Serialize)]
pub struct Categories {
    pub list: Vec<Category>,
}

fn parse_status(raw: Option<String>) -> Result<Option<Status>, ValidationError> {
    non_blank(raw)
        .map(|raw| Status::from_str(raw.trim()))
        .transpose()
}

/// `POST /api/category/create`
pub async fn create<R: Store>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Json(req): Json<CreateCategoryRequest>,
) -> ApiResult<Created> {
    let id = state
        .categories
        .create(NewCategory {
            name: req.name,
            description: non_blank(req.description),
            image: non_blank(req.image),
            sort: req.sort,
        })
        .await?;
    Ok(Envelope::ok("category created", Created { id }))
}

/// `POST /api/category/update`
pub async fn update<R: Store>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Json(req): Json<UpdateCategoryRequest>,
) -> ApiResult<()> {
    let patch = CategoryPatch {
        name: req.name,
        description: req.description,
        image: req.image,
        sort: req.sort,
        status: parse_status(req.status)?,
    };
    state
        .categories
        .update(CategoryId::new(req.id), patch)
        .await?;
    Ok(Envelope::done("category updated"))
}

/// `POST /api/category/delete`
pub async fn delete<R: Store>(
    State(state): State<AppState<R>>,
    _admin: AdminUser,
    Json(body): Json<IdBody>,
) -> ApiResult<()> {
    state.categories.delete(CategoryId::new(body.id)).await?;
    Ok(Envelope::done("category deleted"))
}

/// `GET /api/category/list`
pub async fn list<R: Store>(
    State(state): State<AppState<R>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Categories> {
    let status = parse_status(query.status)?.unwrap_or(Status::Normal);
    let list = state.categories.list(status).await?;
    Ok(Envelope::ok("ok", Categories { list }))
}

/// `GET /api/category/detail`
pub async fn detail<R: Store>(
    State(state): State<AppState<R>>,
    Query(query): Query<DetailQuery>,
) -> ApiResult<Category> {
    let category = state.categories.detail(CategoryId::new(query.id)).await?;
    Ok(Envelope::ok("ok", category))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_no_status_when_blank() {
        assert_eq!(parse_status(Some(String::new())), Ok(None));
        assert_eq!(parse_status(Some("hidden".to_string())), Ok(Some(Status::Hidden)));
        assert!(parse_status(Some("archived".to_string())).is_err());
    }
}
