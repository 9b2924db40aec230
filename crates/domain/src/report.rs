//! Report — a user complaint about a post or a comment.

use std::str::FromStr;

use serde::Serialize;

use crate::error::{CommunityError, ValidationError};
use crate::id::UserId;
use crate::time::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Post,
    Comment,
}

impl ReportKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Comment => "comment",
        }
    }
}

impl FromStr for ReportKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "post" => Ok(Self::Post),
            "comment" => Ok(Self::Comment),
            _ => Err(ValidationError::Invalid {
                field: "type",
                reason: "expected post or comment",
            }),
        }
    }
}

/// Processing state of reports and feedback tickets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    #[default]
    Pending,
    Processed,
    Rejected,
}

impl TicketStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processed => "processed",
            Self::Rejected => "rejected",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "processed" => Some(Self::Processed),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// A selectable reason offered to reporters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportReason {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReport {
    pub user_id: UserId,
    pub kind: ReportKind,
    pub target_id: i64,
    pub reason: String,
    pub content: Option<String>,
    pub images: Vec<String>,
    pub created_at: Timestamp,
}

impl NewReport {
    /// # Errors
    ///
    /// Returns [`CommunityError::Validation`] when the reason is blank or the target id is not positive.
    pub fn validate(&self) -> Result<(), CommunityError> {
        if self.target_id <= 0 {
            return Err(ValidationError::Required("target_id").into());
        }
        if self.reason.trim().is_empty() {
            return Err(ValidationError::Required("reason").into());
        }
        Ok(())
    }
}
