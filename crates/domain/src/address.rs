//! Address — a delivery address owned by a user.

use serde::Serialize;

use crate::error::{CommunityError, ValidationError};
use crate::id::{AddressId, UserId};
use crate::time::Timestamp;
use crate::user::validate_mobile;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Address {
    pub id: AddressId,
    pub user_id: UserId,
    pub name: String,
    pub mobile: String,
    pub province: String,
    pub city: String,
    pub district: String,
    pub address: String,
    pub is_default: bool,
    #[serde(rename = "createtime", with = "chrono::serde::ts_seconds")]
    pub created_at: Timestamp,
    #[serde(rename = "updatetime", with = "chrono::serde::ts_seconds")]
    pub updated_at: Timestamp,
}

/// Fields supplied when creating or replacing an address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressForm {
    pub name: String,
    pub mobile: String,
    pub province: String,
    pub city: String,
    pub district: String,
    pub address: String,
    pub is_default: bool,
}

impl AddressForm {
    /// # Errors
    ///
    /// Returns [`CommunityError::Validation`] naming the first blank field,
    /// or when the mobile number is malformed.
    pub fn validate(&self) -> Result<(), CommunityError> {
        let fields = [
            ("name", &self.name),
            ("mobile", &self.mobile),
            ("province", &self.province),
            ("city", &self.city),
            ("district", &self.district),
            ("address", &self.address),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(ValidationError::Required(field).into());
            }
        }
        validate_mobile(&self.mobile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> AddressForm {
        AddressForm {
            name: "Li Lei".to_string(),
            mobile: "13800138000".to_string(),
            province: "Zhejiang".to_string(),
            city: "Hangzhou".to_string(),
            district: "Xihu".to_string(),
            address: "No. 1 Road".to_string(),
            is_default: false,
        }
    }

    #[test]
    fn should_accept_complete_form() {
        assert!(form().validate().is_ok());
    }

    #[test]
    fn should_name_first_missing_field() {
        let mut form = form();
        form.city = String::new();
        assert!(matches!(
            form.validate(),
            Err(CommunityError::Validation(ValidationError::Required("city")))
        ));
    }
}
