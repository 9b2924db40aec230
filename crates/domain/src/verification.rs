//! One-time verification codes sent to a mobile number.

use std::str::FromStr;

use chrono::Duration;

use crate::error::ValidationError;
use crate::time::Timestamp;

/// Number of digits in a code.
pub const CODE_LEN: usize = 4;

/// How long a code stays valid.
pub const CODE_TTL_MINUTES: i64 = 10;

/// What a code authorizes. Codes for one event never satisfy another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeEvent {
    ResetPassword,
}

impl CodeEvent {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ResetPassword => "resetpwd",
        }
    }
}

impl FromStr for CodeEvent {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resetpwd" => Ok(Self::ResetPassword),
            _ => Err(ValidationError::Invalid {
                field: "event",
                reason: "unsupported event",
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationCode {
    pub mobile: String,
    pub event: CodeEvent,
    pub code: String,
    pub expires_at: Timestamp,
}

impl VerificationCode {
    /// A code issued at `now`, expiring after [`CODE_TTL_MINUTES`].
    #[must_use]
    pub fn issue(mobile: impl Into<String>, event: CodeEvent, code: impl Into<String>, now: Timestamp) -> Self {
        Self {
            mobile: mobile.into(),
            event,
            code: code.into(),
            expires_at: now + Duration::minutes(CODE_TTL_MINUTES),
        }
    }
}
