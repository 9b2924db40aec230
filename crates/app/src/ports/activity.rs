//! Activity trail ports: view history, shares, search keywords.

use std::future::Future;

use community_domain::activity::{NewShare, ShareStats};
use community_domain::error::CommunityError;
use community_domain::id::{PostId, UserId};
use community_domain::page::{PageRequest, Paged};
use community_domain::post::SavedPost;
use community_domain::time::Timestamp;

pub trait HistoryRepository {
    /// Insert the view, or refresh its timestamp when already recorded.
    fn record_view(
        &self,
        user: UserId,
        post: PostId,
        at: Timestamp,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send;

    fn list_history(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<SavedPost>, CommunityError>> + Send;

    fn clear_history(&self, user: UserId)
    -> impl Future<Output = Result<u64, CommunityError>> + Send;
}

pub trait ShareRepository {
    /// Log the share and bump `share_num` in one transaction.
    fn record_share(
        &self,
        share: NewShare,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send;

    /// Share counter of the post with a per-platform breakdown.
    fn share_stats(
        &self,
        post: PostId,
    ) -> impl Future<Output = Result<ShareStats, CommunityError>> + Send;
}

pub trait SearchLogRepository {
    /// Insert the keyword, or refresh its timestamp when already saved.
    fn save_keyword(
        &self,
        user: UserId,
        keyword: String,
        at: Timestamp,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send;

    /// Most recent keywords first.
    fn recent_keywords(
        &self,
        user: UserId,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<String>, CommunityError>> + Send;

    fn clear_keywords(
        &self,
        user: UserId,
    ) -> impl Future<Output = Result<u64, CommunityError>> + Send;
}
