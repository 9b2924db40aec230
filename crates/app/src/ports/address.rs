//! Address book port.

use std::future::Future;

use community_domain::address::{Address, AddressForm};
use community_domain::error::CommunityError;
use community_domain::id::{AddressId, UserId};
use community_domain::time::Timestamp;

/// Addresses are always scoped by owner; an address of another user is
/// indistinguishable from a missing one.
///
/// Implementations keep at most one default address per user and keep
/// `users.default_address_id` pointing at it, in the same transaction as
/// the write.
pub trait AddressRepository {
    /// Default first, then newest.
    fn list_addresses(
        &self,
        user: UserId,
    ) -> impl Future<Output = Result<Vec<Address>, CommunityError>> + Send;

    fn find_address(
        &self,
        user: UserId,
        id: AddressId,
    ) -> impl Future<Output = Result<Option<Address>, CommunityError>> + Send;

    fn create_address(
        &self,
        user: UserId,
        form: AddressForm,
        at: Timestamp,
    ) -> impl Future<Output = Result<AddressId, CommunityError>> + Send;

    fn update_address(
        &self,
        user: UserId,
        id: AddressId,
        form: AddressForm,
        at: Timestamp,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send;

    fn delete_address(
        &self,
        user: UserId,
        id: AddressId,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send;
}
