//! Tag — a free-form label linked to posts.

use std::str::FromStr;

use serde::Serialize;

use crate::error::{CommunityError, ValidationError};
use crate::id::TagId;
use crate::time::Timestamp;

/// Longest accepted tag name.
pub const MAX_TAG_LEN: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub post_count: i64,
    #[serde(rename = "createtime", with = "chrono::serde::ts_seconds")]
    pub created_at: Timestamp,
}

/// Ordering of the tag list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TagSort {
    #[default]
    PostCount,
    CreateTime,
}

impl FromStr for TagSort {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "post_count" => Ok(Self::PostCount),
            "createtime" => Ok(Self::CreateTime),
            _ => Err(ValidationError::Invalid {
                field: "sort_by",
                reason: "expected post_count or createtime",
            }),
        }
    }
}

/// Trim and check a tag name.
///
/// # Errors
///
/// Returns [`CommunityError::Validation`] when the name is blank or too long.
pub fn normalize_tag_name(name: &str) -> Result<String, CommunityError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::Required("name").into());
    }
    if name.chars().count() > MAX_TAG_LEN {
        return Err(ValidationError::TooLong {
            field: "name",
            max: MAX_TAG_LEN,
        }
        .into());
    }
    Ok(name.to_string())
}
