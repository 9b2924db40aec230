//! Comment — a reply left by a user under a post.

use serde::Serialize;

use crate::error::{CommunityError, ValidationError};
use crate::id::{CommentId, PostId, UserId};
use crate::status::Status;
use crate::time::Timestamp;

/// Longest accepted comment body.
pub const MAX_COMMENT_LEN: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub user_id: UserId,
    pub content: String,
    #[serde(skip_serializing)]
    pub ip: Option<String>,
    pub status: Status,
    #[serde(rename = "createtime", with = "chrono::serde::ts_seconds")]
    pub created_at: Timestamp,
    #[serde(rename = "updatetime", with = "chrono::serde::ts_seconds")]
    pub updated_at: Timestamp,
}

/// A comment with its author card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub nickname: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: PostId,
    pub user_id: UserId,
    pub content: String,
    pub ip: Option<String>,
    pub created_at: Timestamp,
}

impl NewComment {
    /// # Errors
    ///
    /// Returns [`CommunityError::Validation`] when the content is blank or too long.
    pub fn validate(&self) -> Result<(), CommunityError> {
        if self.content.trim().is_empty() {
            return Err(ValidationError::Required("content").into());
        }
        if self.content.chars().count() > MAX_COMMENT_LEN {
            return Err(ValidationError::TooLong {
                field: "content",
                max: MAX_COMMENT_LEN,
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::from_unix;

    #[test]
    fn should_reject_comment_when_content_blank() {
        let comment = NewComment {
            post_id: PostId::new(1),
            user_id: UserId::new(1),
            content: "\n ".to_string(),
            ip: None,
            created_at: from_unix(0),
        };
        assert!(matches!(
            comment.validate(),
            Err(CommunityError::Validation(ValidationError::Required("content")))
        ));
    }
}
