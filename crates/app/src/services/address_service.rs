//! Address service — the caller's address book.

use community_domain::address::{Address, AddressForm};
use community_domain::error::CommunityError;
use community_domain::id::{AddressId, UserId};
use community_domain::time::now;

use crate::ports::AddressRepository;

pub struct AddressService<R> {
    repo: R,
}

impl<R: AddressRepository> AddressService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list(&self, user: UserId) -> Result<Vec<Address>, CommunityError> {
        self.repo.list_addresses(user).await
    }

    /// # Errors
    ///
    /// Returns [`CommunityError::Validation`] naming the first missing field.
    pub async fn create(&self, user: UserId, form: AddressForm) -> Result<AddressId, CommunityError> {
        form.validate()?;
        self.repo.create_address(user, form, now()).await
    }

    /// # Errors
    ///
    /// Returns [`CommunityError::NotFound`] when the address is not the caller's.
    pub async fn update(
        &self,
        user: UserId,
        id: AddressId,
        form: AddressForm,
    ) -> Result<(), CommunityError> {
        self.owned(user, id).await?;
        form.validate()?;
        self.repo.update_address(user, id, form, now()).await
    }

    /// # Errors
    ///
    /// Returns [`CommunityError::NotFound`] when the address is not the caller's.
    pub async fn delete(&self, user: UserId, id: AddressId) -> Result<(), CommunityError> {
        self.owned(user, id).await?;
        self.repo.delete_address(user, id).await
    }

    async fn owned(&self, user: UserId, id: AddressId) -> Result<Address, CommunityError> {
        self.repo
            .find_address(user, id)
            .await?
            .ok_or_else(|| CommunityError::not_found("address", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fakes::MemoryStore;

    fn form(is_default: bool) -> AddressForm {
        AddressForm {
            name: "Han Meimei".to_string(),
            mobile: "13800138000".to_string(),
            province: "Zhejiang".to_string(),
            city: "Hangzhou".to_string(),
            district: "Xihu".to_string(),
            address: "Lane 3".to_string(),
            is_default,
        }
    }

    fn make_service() -> AddressService<MemoryStore> {
        let store = MemoryStore::default();
        store.add_user(1);
        store.add_user(2);
        AddressService::new(store)
    }

    #[tokio::test]
    async fn should_keep_single_default_when_creating_defaults() {
        let svc = make_service();
        let first = svc.create(UserId::new(1), form(true)).await.unwrap();
        let second = svc.create(UserId::new(1), form(true)).await.unwrap();

        let list = svc.list(UserId::new(1)).await.unwrap();
        let defaults: Vec<AddressId> = list.iter().filter(|a| a.is_default).map(|a| a.id).collect();
        assert_eq!(defaults, vec![second]);
        assert_ne!(first, second);
        assert_eq!(svc.repo.user(1).unwrap().default_address_id, Some(second));
    }

    #[tokio::test]
    async fn should_return_not_found_when_updating_other_users_address() {
        let svc = make_service();
        let id = svc.create(UserId::new(1), form(false)).await.unwrap();

        let result = svc.update(UserId::new(2), id, form(true)).await;
        assert!(matches!(result, Err(CommunityError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_clear_user_default_when_default_deleted() {
        let svc = make_service();
        let id = svc.create(UserId::new(1), form(true)).await.unwrap();

        svc.delete(UserId::new(1), id).await.unwrap();
        assert!(svc.repo.user(1).unwrap().default_address_id.is_none());
        assert!(svc.list(UserId::new(1)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_clear_user_default_when_default_unset_by_update() {
        let svc = make_service();
        let id = svc.create(UserId::new(1), form(true)).await.unwrap();

        svc.update(UserId::new(1), id, form(false)).await.unwrap();
        assert!(svc.repo.user(1).unwrap().default_address_id.is_none());
    }
}
