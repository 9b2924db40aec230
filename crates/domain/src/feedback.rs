//! Feedback — a suggestion or bug report sent to the operators.

use serde::Serialize;

use crate::error::{CommunityError, ValidationError};
use crate::id::{FeedbackId, UserId};
use crate::report::TicketStatus;
use crate::time::Timestamp;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub id: FeedbackId,
    pub user_id: UserId,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    pub images: Vec<String>,
    pub contact: Option<String>,
    pub status: TicketStatus,
    pub reply: Option<String>,
    #[serde(rename = "createtime", with = "chrono::serde::ts_seconds")]
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedback {
    pub user_id: UserId,
    pub kind: String,
    pub content: String,
    pub images: Vec<String>,
    pub contact: Option<String>,
    pub created_at: Timestamp,
}

impl NewFeedback {
    /// # Errors
    ///
    /// Returns [`CommunityError::Validation`] when the type or content is blank.
    pub fn validate(&self) -> Result<(), CommunityError> {
        if self.kind.trim().is_empty() {
            return Err(ValidationError::Required("type").into());
        }
        if self.content.trim().is_empty() {
            return Err(ValidationError::Required("content").into());
        }
        Ok(())
    }
}
