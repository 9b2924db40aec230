//! Visibility status shared by soft-deletable records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Records are never physically removed; hiding them is the deletion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Normal,
    Hidden,
}

impl Status {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Hidden => "hidden",
        }
    }

    #[must_use]
    pub fn is_visible(self) -> bool {
        self == Self::Normal
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Self::Normal),
            "hidden" => Ok(Self::Hidden),
            _ => Err(ValidationError::Invalid {
                field: "status",
                reason: "expected normal or hidden",
            }),
        }
    }
}
