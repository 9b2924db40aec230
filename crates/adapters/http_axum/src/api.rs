//! JSON API handler modules, mounted under `/api/<module>/<operation>`.
//!
//! Reads are `GET` with query parameters; writes are `POST` with a JSON body.

#[allow(clippy::missing_errors_doc)]
pub mod address;
#[allow(clippy::missing_errors_doc)]
pub mod audit;
#[allow(clippy::missing_errors_doc)]
pub mod auth;
#[allow(clippy::missing_errors_doc)]
pub mod blacklist;
#[allow(clippy::missing_errors_doc)]
pub mod category;
#[allow(clippy::missing_errors_doc)]
pub mod comment;
#[allow(clippy::missing_errors_doc)]
pub mod common;
#[allow(clippy::missing_errors_doc)]
pub mod config;
#[allow(clippy::missing_errors_doc)]
pub mod favorite;
#[allow(clippy::missing_errors_doc)]
pub mod feedback;
#[allow(clippy::missing_errors_doc)]
pub mod follow;
#[allow(clippy::missing_errors_doc)]
pub mod history;
#[allow(clippy::missing_errors_doc)]
pub mod index;
#[allow(clippy::missing_errors_doc)]
pub mod message;
#[allow(clippy::missing_errors_doc)]
pub mod pin;
#[allow(clippy::missing_errors_doc)]
pub mod post;
#[allow(clippy::missing_errors_doc)]
pub mod report;
#[allow(clippy::missing_errors_doc)]
pub mod search;
#[allow(clippy::missing_errors_doc)]
pub mod share;
#[allow(clippy::missing_errors_doc)]
pub mod tag;
#[allow(clippy::missing_errors_doc)]
pub mod user;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use serde::{Deserialize, Deserializer};

use community_app::ports::Store;
use community_domain::page::PageRequest;

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::state::AppState;
use crate::upload::UPLOAD_BODY_LIMIT;

pub type ApiResult<T> = Result<Envelope<T>, ApiError>;

/// `page` and `page_size` query parameters, normalized by [`PageRequest`].
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl From<PageQuery> for PageRequest {
    fn from(query: PageQuery) -> Self {
        PageRequest::new(query.page, query.page_size)
    }
}

#[derive(Debug, Deserialize)]
pub struct IdBody {
    #[serde(default)]
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct PostIdBody {
    #[serde(default)]
    pub post_id: i64,
}

/// Empty strings from form-like clients mean "not given".
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Accepts `true`/`false`, `0`/`1` and their string forms.
pub(crate) fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Int(value) => value != 0,
        Flag::Text(value) => matches!(value.as_str(), "1" | "true"),
    })
}

/// Build the `/api` sub-router.
#[allow(clippy::too_many_lines)]
pub fn routes<R: Store>() -> Router<AppState<R>> {
    Router::new()
        // Auth
        .route("/user/register", post(auth::register::<R>))
        .route("/user/login", post(auth::login::<R>))
        .route("/token/refresh", post(auth::refresh::<R>))
        // User
        .route("/user/profile", get(user::profile::<R>))
        .route("/user/update", post(user::update::<R>))
        .route("/user/change_password", post(user::change_password::<R>))
        .route("/user/send_code", post(user::send_code::<R>))
        .route("/user/reset_password", post(user::reset_password::<R>))
        .route("/user/posts", get(user::my_posts::<R>))
        .route("/user/favorites", get(user::my_favorites::<R>))
        // Posts
        .route("/post/create", post(post::create::<R>))
        .route("/post/detail", get(post::detail::<R>))
        .route("/post/list", get(post::list::<R>))
        .route("/post/delete", post(post::delete::<R>))
        .route("/post/like", post(post::like::<R>))
        .route("/post/collect", post(post::collect::<R>))
        // Comments
        .route("/comment/create", post(comment::create::<R>))
        .route("/comment/list", get(comment::list::<R>))
        .route("/comment/delete", post(comment::delete::<R>))
        // Favorites
        .route("/favorite/toggle", post(favorite::toggle::<R>))
        .route("/favorite/list", get(favorite::list::<R>))
        .route("/favorite/check", get(favorite::check::<R>))
        // Follows
        .route("/follow/toggle", post(follow::toggle::<R>))
        .route("/follow/follow_list", get(follow::follow_list::<R>))
        .route("/follow/fans_list", get(follow::fans_list::<R>))
        .route("/follow/check", get(follow::check::<R>))
        // Blacklist
        .route("/blacklist/toggle", post(blacklist::toggle::<R>))
        .route("/blacklist/list", get(blacklist::list::<R>))
        .route("/blacklist/check", get(blacklist::check::<R>))
        .route("/blacklist/check_blocked", get(blacklist::check_blocked::<R>))
        // Messages
        .route("/message/unread_count", get(message::unread_count::<R>))
        .route("/message/list", get(message::list::<R>))
        .route("/message/read", post(message::read::<R>))
        // History
        .route("/history/record", post(history::record::<R>))
        .route("/history/list", get(history::list::<R>))
        .route("/history/clear", post(history::clear::<R>))
        // Shares
        .route("/share/link", get(share::link::<R>))
        .route("/share/resolve", get(share::resolve::<R>))
        .route("/share/record", post(share::record::<R>))
        .route("/share/stats", get(share::stats::<R>))
        // Search
        .route("/search/save_log", post(search::save_log::<R>))
        .route("/search/history", get(search::history::<R>))
        .route("/search/clear", post(search::clear::<R>))
        // Feedback
        .route("/feedback/create", post(feedback::create::<R>))
        .route("/feedback/list", get(feedback::list::<R>))
        // Reports
        .route("/report/reasons", get(report::reasons::<R>))
        .route("/report/create", post(report::create::<R>))
        // Addresses
        .route("/address/list", get(address::list::<R>))
        .route("/address/create", post(address::create::<R>))
        .route("/address/update", post(address::update::<R>))
        .route("/address/delete", post(address::delete::<R>))
        // Stick / recommend
        .route("/stick/toggle", post(pin::toggle_stick::<R>))
        .route("/stick/list", get(pin::list_sticks::<R>))
        .route("/stick/check", get(pin::check_stick::<R>))
        .route("/recommend/toggle", post(pin::toggle_recommend::<R>))
        .route("/recommend/list", get(pin::list_recommends::<R>))
        .route("/recommend/check", get(pin::check_recommend::<R>))
        // Audits
        .route("/audit/submit", post(audit::submit::<R>))
        .route("/audit/review", post(audit::review::<R>))
        .route("/audit/list", get(audit::list::<R>))
        .route("/audit/detail", get(audit::detail::<R>))
        // Categories
        .route("/category/create", post(category::create::<R>))
        .route("/category/update", post(category::update::<R>))
        .route("/category/delete", post(category::delete::<R>))
        .route("/category/list", get(category::list::<R>))
        .route("/category/detail", get(category::detail::<R>))
        // Tags
        .route("/tag/create", post(tag::create::<R>))
        .route("/tag/delete", post(tag::delete::<R>))
        .route("/tag/list", get(tag::list::<R>))
        .route("/tag/hot", get(tag::hot::<R>))
        .route("/tag/by_post", get(tag::by_post::<R>))
        .route("/tag/set_post_tags", post(tag::set_post_tags::<R>))
        // Site configuration
        .route("/config/list", get(config::list::<R>))
        .route("/config/get", get(config::get::<R>))
        .route("/config/update", post(config::update::<R>))
        .route("/config/create", post(config::create::<R>))
        .route("/config/delete", post(config::delete::<R>))
        // Common
        .route("/common/config", get(common::config::<R>))
        .route("/common/config_all", get(common::config_all::<R>))
        .route(
            "/common/upload",
            post(common::upload::<R>).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/common/area", get(common::area::<R>))
        .route("/common/version", get(common::version::<R>))
        .route("/common/community", get(common::community::<R>))
        // Home
        .route("/index/init", get(index::init::<R>))
        .route("/index/categories", get(index::categories::<R>))
        .route("/index/banners", get(index::banners::<R>))
}
