//! Post publishing, browsing, likes and collects.

use std::str::FromStr;

use axum::extract::State;
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

use community_app::ports::Store;
use community_domain::error::ValidationError;
use community_domain::id::{CategoryId, PostId};
use community_domain::page::Paged;
use community_domain::post::{
    Housing, JobOffer, NewPost, PostExtension, PostFilter, PostType, PostView, Rideshare,
    SecondHand,
};
use community_domain::time::now;

use crate::api::{ApiResult, IdBody, PageQuery, non_blank};
use crate::auth::{AuthUser, MaybeUser};
use crate::envelope::Envelope;
use crate::extract::{Json, Query, client_ip};
use crate::state::AppState;

/// Body of `post/create`. Type-specific fields sit at the top level next to
/// the common ones; only those matching `type` are read.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreatePostRequest {
    pub category_id: i64,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub post_type: Option<String>,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub location: Option<String>,
    #[serde(flatten)]
    pub details: ExtensionFields,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExtensionFields {
    pub price: Option<f64>,
    pub contact: Option<String>,
    pub condition: Option<String>,
    pub area: Option<f64>,
    pub room: Option<String>,
    pub address: Option<String>,
    pub salary: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub start_place: Option<String>,
    pub end_place: Option<String>,
    pub time: Option<String>,
    pub seats: Option<i64>,
}

impl ExtensionFields {
    fn into_extension(self, post_type: PostType) -> Option<PostExtension> {
        let contact = self.contact.unwrap_or_default();
        match post_type {
            PostType::General => None,
            PostType::Second => Some(PostExtension::Second(SecondHand {
                price: self.price.unwrap_or_default(),
                contact,
                condition: non_blank(self.condition),
            })),
            PostType::House => Some(PostExtension::House(Housing {
                price: self.price.unwrap_or_default(),
                area: self.area.unwrap_or_default(),
                room: self.room.unwrap_or_default(),
                contact,
                address: non_blank(self.address),
            })),
            PostType::Job => Some(PostExtension::Job(JobOffer {
                salary: self.salary.unwrap_or_default(),
                company: self.company.unwrap_or_default(),
                contact,
                position: non_blank(self.position),
            })),
            PostType::Car => Some(PostExtension::Car(Rideshare {
                start_place: self.start_place.unwrap_or_default(),
                end_place: self.end_place.unwrap_or_default(),
                time: self.time.unwrap_or_default(),
                seats: self.seats,
                contact,
            })),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    #[serde(default)]
    pub id: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "type")]
    pub post_type: Option<String>,
    pub category_id: Option<i64>,
    pub keyword: Option<String>,
}

impl ListQuery {
    fn into_filter(self) -> Result<PostFilter, ValidationError> {
        let post_type = non_blank(self.post_type)
            .map(|raw| PostType::from_str(&raw))
            .transpose()?;
        Ok(PostFilter {
            post_type,
            category_id: self.category_id.filter(|id| *id > 0).map(CategoryId::new),
            keyword: non_blank(self.keyword).map(|k| k.trim().to_string()),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct Created {
    pub id: PostId,
}

#[derive(Debug, Serialize)]
pub struct Liked {
    pub liked: bool,
}

#[derive(Debug, Serialize)]
pub struct Favorited {
    pub favorited: bool,
}

/// `POST /api/post/create`
pub async fn create<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    headers: HeaderMap,
    Json(req): Json<CreatePostRequest>,
) -> ApiResult<Created> {
    if req.category_id <= 0 {
        return Err(ValidationError::Required("category_id").into());
    }
    let post_type = match non_blank(req.post_type) {
        Some(raw) => PostType::from_str(&raw)?,
        None => PostType::General,
    };
    let id = state
        .posts
        .create(NewPost {
            user_id: user.id,
            category_id: CategoryId::new(req.category_id),
            title: req.title,
            description: non_blank(req.description),
            content: req.content,
            images: req.images,
            location: non_blank(req.location),
            ip: client_ip(&headers),
            extension: req.details.into_extension(post_type),
            created_at: now(),
        })
        .await?;
    Ok(Envelope::ok("published", Created { id }))
}

/// `GET /api/post/detail`
pub async fn detail<R: Store>(
    State(state): State<AppState<R>>,
    viewer: MaybeUser,
    Query(query): Query<DetailQuery>,
) -> ApiResult<PostView> {
    let post = state
        .posts
        .detail(PostId::new(query.id), viewer.id())
        .await?;
    Ok(Envelope::ok("ok", post))
}

/// `GET /api/post/list`
pub async fn list<R: Store>(
    State(state): State<AppState<R>>,
    viewer: MaybeUser,
    Query(filter): Query<ListQuery>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Paged<PostView>> {
    let posts = state
        .posts
        .list(filter.into_filter()?, viewer.id(), page.into())
        .await?;
    Ok(Envelope::ok("ok", posts))
}

/// `POST /api/post/delete`
pub async fn delete<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Json(body): Json<IdBody>,
) -> ApiResult<()> {
    state.posts.delete(PostId::new(body.id), user.id).await?;
    Ok(Envelope::done("deleted"))
}

/// `POST /api/post/like`
pub async fn like<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Json(body): Json<IdBody>,
) -> ApiResult<Liked> {
    let liked = state
        .posts
        .toggle_like(PostId::new(body.id), user.id)
        .await?
        .is_on();
    let msg = if liked { "liked" } else { "unliked" };
    Ok(Envelope::ok(msg, Liked { liked }))
}

/// `POST /api/post/collect`, an alias of `favorite/toggle` keyed by `id`.
pub async fn collect<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Json(body): Json<IdBody>,
) -> ApiResult<Favorited> {
    let favorited = state
        .favorites
        .toggle(user.id, PostId::new(body.id))
        .await?
        .is_on();
    let msg = if favorited { "collected" } else { "uncollected" };
    Ok(Envelope::ok(msg, Favorited { favorited }))
}
