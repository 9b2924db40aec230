//! Notification inbox.

use std::str::FromStr;

use axum::extract::State;
use serde::{Deserialize, Serialize};

use community_app::ports::Store;
use community_domain::error::ValidationError;
use community_domain::id::MessageId;
use community_domain::message::{MessageView, ReadTarget};
use community_domain::page::Paged;

use crate::api::{ApiResult, PageQuery};
use crate::auth::AuthUser;
use crate::envelope::Envelope;
use crate::extract::{Json, Query};
use crate::state::AppState;

/// `id` of a read request: a message id, as number or string, or `"all"`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ReadId {
    Id(i64),
    Text(String),
}

impl TryFrom<ReadId> for ReadTarget {
    type Error = ValidationError;

    fn try_from(id: ReadId) -> Result<Self, Self::Error> {
        match id {
            ReadId::Id(id) => Ok(Self::One(MessageId::new(id))),
            ReadId::Text(text) => Self::from_str(text.trim()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReadRequest {
    pub id: Option<ReadId>,
}

#[derive(Debug, Serialize)]
pub struct Count {
    pub count: i64,
}

/// `GET /api/message/unread_count`
pub async fn unread_count<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
) -> ApiResult<Count> {
    let count = state.messages.unread_count(user.id).await?;
    Ok(Envelope::ok("ok", Count { count }))
}

/// `GET /api/message/list`
pub async fn list<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Query(page): Query<PageQuery>,
) -> ApiResult<Paged<MessageView>> {
    let messages = state.messages.list(user.id, page.into()).await?;
    Ok(Envelope::ok("ok", messages))
}

/// `POST /api/message/read`
pub async fn read<R: Store>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    Json(req): Json<ReadRequest>,
) -> ApiResult<()> {
    let target = ReadTarget::try_from(req.id.ok_or(ValidationError::Required("id"))?)?;
    state.messages.mark_read(user.id, target).await?;
    Ok(Envelope::done("marked as read"))
}
