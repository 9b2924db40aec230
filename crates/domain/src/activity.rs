//! Activity trails: shares and search keywords.

use serde::Serialize;

use crate::error::{CommunityError, ValidationError};
use crate::id::{PostId, UserId};
use crate::time::Timestamp;

/// Longest accepted search keyword.
pub const MAX_KEYWORD_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShare {
    pub post_id: PostId,
    pub user_id: Option<UserId>,
    pub platform: Option<String>,
    pub ip: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformCount {
    pub platform: Option<String>,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareStats {
    pub total: i64,
    pub platforms: Vec<PlatformCount>,
}

/// Trim and check a search keyword.
///
/// # Errors
///
/// Returns [`CommunityError::Validation`] when the keyword is blank or too long.
pub fn normalize_keyword(keyword: &str) -> Result<String, CommunityError> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return Err(ValidationError::Required("keyword").into());
    }
    if keyword.chars().count() > MAX_KEYWORD_LEN {
        return Err(ValidationError::TooLong {
            field: "keyword",
            max: MAX_KEYWORD_LEN,
        }
        .into());
    }
    Ok(keyword.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_trim_keyword() {
        assert_eq!(normalize_keyword(" sofa ").unwrap(), "sofa");
        assert!(normalize_keyword("").is_err());
    }
}
