//! Moderation records: pinned posts (stick, recommend) and post audits.

use std::str::FromStr;

use serde::Serialize;

use crate::error::ValidationError;
use crate::id::{PostId, UserId};
use crate::status::Status;
use crate::time::Timestamp;

/// The two admin-managed pin lists. Both share one shape and lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinKind {
    Stick,
    Recommend,
}

impl PinKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stick => "stick",
            Self::Recommend => "recommend",
        }
    }
}

/// An active pin joined with its post and the admin who set it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PinEntry {
    pub post_id: PostId,
    pub admin_id: UserId,
    pub admin_name: Option<String>,
    #[serde(rename = "pin_time", with = "chrono::serde::ts_seconds")]
    pub pinned_at: Timestamp,
    #[serde(with = "chrono::serde::ts_seconds_option")]
    pub end_time: Option<Timestamp>,
    pub title: String,
    pub content: String,
    pub view_num: i64,
    pub like_num: i64,
    pub comment_num: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl AuditStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for AuditStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ValidationError::Invalid {
                field: "status",
                reason: "expected pending, approved or rejected",
            }),
        }
    }
}

/// Final outcome an admin may record; an audit never returns to pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl ReviewDecision {
    #[must_use]
    pub fn audit_status(self) -> AuditStatus {
        match self {
            Self::Approved => AuditStatus::Approved,
            Self::Rejected => AuditStatus::Rejected,
        }
    }

    /// Visibility the reviewed post takes.
    #[must_use]
    pub fn post_status(self) -> Status {
        match self {
            Self::Approved => Status::Normal,
            Self::Rejected => Status::Hidden,
        }
    }
}

impl FromStr for ReviewDecision {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ValidationError::Invalid {
                field: "status",
                reason: "expected approved or rejected",
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Audit {
    pub post_id: PostId,
    pub admin_id: Option<UserId>,
    pub status: AuditStatus,
    pub reason: Option<String>,
    #[serde(rename = "createtime", with = "chrono::serde::ts_seconds")]
    pub created_at: Timestamp,
    #[serde(rename = "updatetime", with = "chrono::serde::ts_seconds")]
    pub updated_at: Timestamp,
}

/// An audit joined with its post and reviewer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntry {
    #[serde(flatten)]
    pub audit: Audit,
    pub title: String,
    pub content: String,
    pub view_num: i64,
    pub like_num: i64,
    pub comment_num: i64,
    pub admin_name: Option<String>,
}

/// A decision to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub post_id: PostId,
    pub admin_id: UserId,
    pub decision: ReviewDecision,
    pub reason: Option<String>,
    pub reviewed_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_hide_post_when_rejected() {
        assert_eq!(ReviewDecision::Rejected.post_status(), Status::Hidden);
        assert_eq!(ReviewDecision::Approved.post_status(), Status::Normal);
    }

    #[test]
    fn should_refuse_pending_as_decision() {
        assert!("pending".parse::<ReviewDecision>().is_err());
        assert!("pending".parse::<AuditStatus>().is_ok());
    }
}
