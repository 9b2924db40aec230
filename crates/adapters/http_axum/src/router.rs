//! Axum router assembly.

use std::time::Duration;

use axum::Router;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method};
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use community_app::ports::Store;

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Mounts the JSON API under `/api` and serves stored uploads under their
/// public prefix. Unknown paths answer with the error envelope.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<R: Store>(state: AppState<R>) -> Router {
    let mut router = Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes());

    let prefix = state.uploads.public_prefix().trim_end_matches('/');
    if prefix.starts_with('/') && prefix.len() > 1 {
        router = router.nest_service(prefix, ServeDir::new(state.uploads.dir()));
    }

    router
        .fallback(crate::error::no_route)
        .layer(cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION, HeaderName::from_static("token")])
        .max_age(Duration::from_secs(60 * 60))
}

async fn health_check() -> &'static str {
    "OK"
}
