//! Setting — a named site configuration value editable by admins.

use serde::Serialize;

use crate::error::{CommunityError, ValidationError};
use crate::id::SettingId;
use crate::status::Status;
use crate::time::Timestamp;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Setting {
    pub id: SettingId,
    pub name: String,
    pub group: String,
    pub title: String,
    pub tip: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: Option<String>,
    pub sort: i64,
    pub status: Status,
    #[serde(rename = "createtime", with = "chrono::serde::ts_seconds")]
    pub created_at: Timestamp,
    #[serde(rename = "updatetime", with = "chrono::serde::ts_seconds")]
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewSetting {
    pub name: String,
    pub group: String,
    pub title: String,
    pub kind: String,
    pub tip: Option<String>,
    pub value: Option<String>,
    pub sort: i64,
}

impl NewSetting {
    /// # Errors
    ///
    /// Returns [`CommunityError::Validation`] naming the first blank required field.
    pub fn validate(&self) -> Result<(), CommunityError> {
        let fields = [
            ("name", &self.name),
            ("group", &self.group),
            ("title", &self.title),
            ("type", &self.kind),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(ValidationError::Required(field).into());
            }
        }
        Ok(())
    }
}

/// One `{name, value}` pair of a bulk update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingValue {
    pub name: String,
    pub value: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_require_group_when_creating_setting() {
        let setting = NewSetting {
            name: "site_name".to_string(),
            title: "Site name".to_string(),
            kind: "string".to_string(),
            ..NewSetting::default()
        };
        assert!(matches!(
            setting.validate(),
            Err(CommunityError::Validation(ValidationError::Required("group")))
        ));
    }
}
