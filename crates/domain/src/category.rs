//! Category — the top-level classification every post belongs to.

use serde::Serialize;

use crate::error::{CommunityError, ValidationError};
use crate::id::CategoryId;
use crate::status::Status;
use crate::time::Timestamp;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub sort: i64,
    pub post_count: i64,
    pub status: Status,
    #[serde(rename = "createtime", with = "chrono::serde::ts_seconds")]
    pub created_at: Timestamp,
    #[serde(rename = "updatetime", with = "chrono::serde::ts_seconds")]
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub sort: i64,
}

impl NewCategory {
    /// # Errors
    ///
    /// Returns [`CommunityError::Validation`] when the name is blank.
    pub fn validate(&self) -> Result<(), CommunityError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Required("name").into());
        }
        Ok(())
    }
}

/// Partial update; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub sort: Option<i64>,
    pub status: Option<Status>,
}

impl CategoryPatch {
    /// Apply the patch onto an existing category.
    ///
    /// # Errors
    ///
    /// Returns [`CommunityError::Validation`] when the new name is blank.
    pub fn apply(self, category: &mut Category) -> Result<(), CommunityError> {
        if let Some(name) = self.name {
            if name.trim().is_empty() {
                return Err(ValidationError::Required("name").into());
            }
            category.name = name;
        }
        if let Some(description) = self.description {
            category.description = Some(description);
        }
        if let Some(image) = self.image {
            category.image = Some(image);
        }
        if let Some(sort) = self.sort {
            category.sort = sort;
        }
        if let Some(status) = self.status {
            category.status = status;
        }
        Ok(())
    }
}
