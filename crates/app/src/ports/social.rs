//! Follow and blacklist ports.

use std::future::Future;

use community_domain::error::CommunityError;
use community_domain::id::UserId;
use community_domain::page::{PageRequest, Paged};
use community_domain::relation::Toggle;
use community_domain::user::RelatedUser;

pub trait FollowRepository {
    /// Flip the `user -> target` edge and adjust `follow_num` / `fans_num`
    /// in one transaction.
    fn toggle_follow(
        &self,
        user: UserId,
        target: UserId,
    ) -> impl Future<Output = Result<Toggle, CommunityError>> + Send;

    fn is_following(
        &self,
        user: UserId,
        target: UserId,
    ) -> impl Future<Output = Result<bool, CommunityError>> + Send;

    /// Users `user` follows.
    fn list_following(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<RelatedUser>, CommunityError>> + Send;

    /// Users following `user`.
    fn list_fans(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<RelatedUser>, CommunityError>> + Send;
}

pub trait BlacklistRepository {
    /// Flip the block. Blocking also severs follow edges in both directions
    /// and fixes both users' counters, in one transaction.
    fn toggle_block(
        &self,
        user: UserId,
        target: UserId,
    ) -> impl Future<Output = Result<Toggle, CommunityError>> + Send;

    /// Whether `user` has blocked `target`.
    fn is_blocked(
        &self,
        user: UserId,
        target: UserId,
    ) -> impl Future<Output = Result<bool, CommunityError>> + Send;

    fn list_blocked(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<RelatedUser>, CommunityError>> + Send;
}
