//! Typed identifier newtypes backed by database row ids.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap an existing row id.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Access the inner row id.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a [`User`](crate::user::User).
    UserId
);

define_id!(
    /// Unique identifier for a [`Post`](crate::post::Post).
    PostId
);

define_id!(
    /// Unique identifier for a [`Category`](crate::category::Category).
    CategoryId
);

define_id!(
    /// Unique identifier for a [`Tag`](crate::tag::Tag).
    TagId
);

define_id!(
    /// Unique identifier for a [`Comment`](crate::comment::Comment).
    CommentId
);

define_id!(
    /// Unique identifier for a [`Message`](crate::message::Message).
    MessageId
);

define_id!(
    /// Unique identifier for an [`Address`](crate::address::Address).
    AddressId
);

define_id!(
    /// Unique identifier for a [`Report`](crate::report::NewReport).
    ReportId
);

define_id!(
    /// Unique identifier for a [`Feedback`](crate::feedback::Feedback).
    FeedbackId
);

define_id!(
    /// Unique identifier for a [`Setting`](crate::setting::Setting).
    SettingId
);
