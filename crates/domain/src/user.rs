//! User — an account, its profile, and the public projections other users see.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CommunityError, ValidationError};
use crate::id::{AddressId, UserId};
use crate::status::Status;
use crate::time::Timestamp;

/// Minimum length for a login password.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Longest accepted username or nickname.
pub const MAX_NAME_LEN: usize = 50;

/// Authorization level carried by an account and its tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    #[must_use]
    pub fn is_admin(self) -> bool {
        self == Self::Admin
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(ValidationError::Invalid {
                field: "role",
                reason: "expected user or admin",
            }),
        }
    }
}

/// A registered account. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub nickname: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub mobile: Option<String>,
    pub avatar: Option<String>,
    pub gender: u8,
    pub bio: Option<String>,
    pub score: i64,
    pub follow_num: i64,
    pub fans_num: i64,
    pub default_address_id: Option<AddressId>,
    pub role: UserRole,
    pub status: Status,
    #[serde(rename = "createtime", with = "chrono::serde::ts_seconds")]
    pub created_at: Timestamp,
    #[serde(rename = "updatetime", with = "chrono::serde::ts_seconds")]
    pub updated_at: Timestamp,
    #[serde(rename = "last_login_time", with = "chrono::serde::ts_seconds_option")]
    pub last_login_at: Option<Timestamp>,
}

/// The subset of a user returned by login.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: UserId,
    pub username: String,
    pub nickname: Option<String>,
    pub mobile: Option<String>,
    pub avatar: Option<String>,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            nickname: user.nickname.clone(),
            mobile: user.mobile.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

/// Input of the registration flow, before hashing.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub mobile: Option<String>,
}

impl Registration {
    /// # Errors
    ///
    /// Returns [`CommunityError::Validation`] when the username is blank,
    /// the password is too short, or the mobile number is malformed.
    pub fn validate(&self) -> Result<(), CommunityError> {
        if self.username.trim().is_empty() {
            return Err(ValidationError::Required("username").into());
        }
        if self.username.chars().count() > MAX_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: "username",
                max: MAX_NAME_LEN,
            }
            .into());
        }
        validate_password(&self.password)?;
        if let Some(mobile) = &self.mobile {
            validate_mobile(mobile)?;
        }
        Ok(())
    }
}

/// A user row ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub nickname: String,
    pub password_hash: String,
    pub mobile: Option<String>,
    pub created_at: Timestamp,
}

/// Profile fields a user may edit.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub nickname: String,
    pub avatar: Option<String>,
    pub mobile: Option<String>,
    pub gender: Option<u8>,
    pub bio: Option<String>,
}

impl ProfileUpdate {
    /// # Errors
    ///
    /// Returns [`CommunityError::Validation`] when the nickname is blank or too
    /// long, the gender is out of range, or the mobile number is malformed.
    pub fn validate(&self) -> Result<(), CommunityError> {
        if self.nickname.trim().is_empty() {
            return Err(ValidationError::Required("nickname").into());
        }
        if self.nickname.chars().count() > MAX_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: "nickname",
                max: MAX_NAME_LEN,
            }
            .into());
        }
        if self.gender.is_some_and(|g| g > 2) {
            return Err(ValidationError::Invalid {
                field: "gender",
                reason: "expected 0, 1 or 2",
            }
            .into());
        }
        if let Some(mobile) = &self.mobile {
            validate_mobile(mobile)?;
        }
        Ok(())
    }
}

/// Public card of another user, used in follow, fan and blacklist lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedUser {
    pub id: UserId,
    pub nickname: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    #[serde(rename = "createtime", with = "chrono::serde::ts_seconds")]
    pub since: Timestamp,
}

/// # Errors
///
/// Returns [`CommunityError::Validation`] when the password is too short.
pub fn validate_password(password: &str) -> Result<(), CommunityError> {
    if password.is_empty() {
        return Err(ValidationError::Required("password").into());
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password",
            min: MIN_PASSWORD_LEN,
        }
        .into());
    }
    Ok(())
}

/// Mainland mobile numbers: eleven digits starting with `1`.
///
/// # Errors
///
/// Returns [`CommunityError::Validation`] when the number is malformed.
pub fn validate_mobile(mobile: &str) -> Result<(), CommunityError> {
    if mobile.is_empty() {
        return Err(ValidationError::Required("mobile").into());
    }
    let well_formed =
        mobile.len() == 11 && mobile.starts_with('1') && mobile.bytes().all(|b| b.is_ascii_digit());
    if !well_formed {
        return Err(ValidationError::Invalid {
            field: "mobile",
            reason: "expected 11 digits starting with 1",
        }
        .into());
    }
    Ok(())
}
