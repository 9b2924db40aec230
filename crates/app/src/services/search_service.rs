//! Search service — per-user keyword history.

use community_domain::activity::normalize_keyword;
use community_domain::error::CommunityError;
use community_domain::id::UserId;
use community_domain::time::now;

use crate::ports::SearchLogRepository;

/// Keywords returned when the caller does not ask for a count.
pub const DEFAULT_HISTORY_LIMIT: i64 = 10;
const MAX_HISTORY_LIMIT: i64 = 50;

pub struct SearchService<R> {
    repo: R,
}

impl<R: SearchLogRepository> SearchService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// # Errors
    ///
    /// Returns [`CommunityError::Validation`] for a blank keyword.
    pub async fn save(&self, user: UserId, keyword: &str) -> Result<(), CommunityError> {
        let keyword = normalize_keyword(keyword)?;
        self.repo.save_keyword(user, keyword, now()).await
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn history(
        &self,
        user: UserId,
        limit: Option<i64>,
    ) -> Result<Vec<String>, CommunityError> {
        let limit = limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT);
        self.repo.recent_keywords(user, limit).await
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn clear(&self, user: UserId) -> Result<u64, CommunityError> {
        self.repo.clear_keywords(user).await
    }
}
