//! Message — an in-app notification delivered to a single recipient.

use std::str::FromStr;

use serde::Serialize;

use crate::id::{CommentId, MessageId, PostId, UserId};
use crate::moderation::ReviewDecision;
use crate::time::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    System,
    Comment,
    Like,
}

impl MessageKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Comment => "comment",
            Self::Like => "like",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "system" => Some(Self::System),
            "comment" => Some(Self::Comment),
            "like" => Some(Self::Like),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub id: MessageId,
    pub user_id: UserId,
    pub from_id: Option<UserId>,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub title: String,
    pub content: String,
    pub post_id: Option<PostId>,
    pub comment_id: Option<CommentId>,
    pub is_read: bool,
    #[serde(rename = "createtime", with = "chrono::serde::ts_seconds")]
    pub created_at: Timestamp,
}

/// A message with the sender card and the referenced post title.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageView {
    #[serde(flatten)]
    pub message: Message,
    pub from_nickname: Option<String>,
    pub from_avatar: Option<String>,
    pub post_title: Option<String>,
}

/// A notification to insert. `comment_id` is filled by the storage layer
/// when the message is written alongside the comment it refers to.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub user_id: UserId,
    pub from_id: Option<UserId>,
    pub kind: MessageKind,
    pub title: String,
    pub content: String,
    pub post_id: Option<PostId>,
    pub comment_id: Option<CommentId>,
    pub created_at: Timestamp,
}

impl NewMessage {
    /// A like notice for the post author, or `None` when the author liked their own post.
    #[must_use]
    pub fn like(
        author: UserId,
        actor: UserId,
        post_id: PostId,
        post_title: &str,
        at: Timestamp,
    ) -> Option<Self> {
        (author != actor).then(|| Self {
            user_id: author,
            from_id: Some(actor),
            kind: MessageKind::Like,
            title: "New like".to_string(),
            content: format!("Your post \"{post_title}\" received a like"),
            post_id: Some(post_id),
            comment_id: None,
            created_at: at,
        })
    }

    /// A comment notice for the post author, or `None` on a self comment.
    #[must_use]
    pub fn comment(
        author: UserId,
        actor: UserId,
        post_id: PostId,
        post_title: &str,
        at: Timestamp,
    ) -> Option<Self> {
        (author != actor).then(|| Self {
            user_id: author,
            from_id: Some(actor),
            kind: MessageKind::Comment,
            title: "New comment".to_string(),
            content: format!("Your post \"{post_title}\" received a comment"),
            post_id: Some(post_id),
            comment_id: None,
            created_at: at,
        })
    }

    /// System notice telling an author how the review of their post ended.
    #[must_use]
    pub fn audit_result(
        author: UserId,
        post_id: PostId,
        post_title: &str,
        decision: ReviewDecision,
        reason: Option<&str>,
        at: Timestamp,
    ) -> Self {
        let content = match (decision, reason) {
            (ReviewDecision::Approved, _) => format!("Your post \"{post_title}\" was approved"),
            (ReviewDecision::Rejected, Some(reason)) => {
                format!("Your post \"{post_title}\" was rejected: {reason}")
            }
            (ReviewDecision::Rejected, None) => format!("Your post \"{post_title}\" was rejected"),
        };
        Self {
            user_id: author,
            from_id: None,
            kind: MessageKind::System,
            title: "Audit result".to_string(),
            content,
            post_id: Some(post_id),
            comment_id: None,
            created_at: at,
        }
    }
}

/// Which messages a read acknowledgement covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadTarget {
    One(MessageId),
    All,
}

impl FromStr for ReadTarget {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Self::All);
        }
        s.parse().map(Self::One).map_err(|_| crate::error::ValidationError::Invalid {
            field: "id",
            reason: "expected a message id or all",
        })
    }
}
