//! User feedback tickets.

use axum::extract::State;
use serde::{Deserialize, Serialize};

use community_app::ports::Store;
use community_domain::feedback::{Feedback, NewFeedback};
use community_domain::id::FeedbackId;
use community_domain::page::Paged;
use community_domain::time::now;

use crate::api::{ApiResult, PageQuery, non_blank};
use crate::auth::AuthUser;
use crate::envelope::Envelope;
use crate::extract::{Json, Query};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateFeedbackRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    pub images: Vec<String>,
    pub contact: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Created {
    pub id: FeedbackId,
}

/// `POST /api/feedback/create`
pub async fn create<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Json(req): Json<CreateFeedbackRequest>,
) -> ApiResult<Created> {
    let id = state
        .feedback
        .create(NewFeedback {
            user_id: user.id,
            kind: req.kind,
            content: req.content,
            images: req.images,
            contact: non_blank(req.contact),
            created_at: now(),
        })
        .await?;
    Ok(Envelope::ok("feedback submitted", Created { id }))
}

/// `GET /api/feedback/list`
pub async fn list<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Query(page): Query<PageQuery>,
) -> ApiResult<Paged<Feedback>> {
    let feedback = state.feedback.list(user.id, page.into()).await?;
    Ok(Envelope::ok("ok", feedback))
}
