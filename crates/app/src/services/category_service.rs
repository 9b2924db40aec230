//! Category service — admin management and public listing of categories.

use community_domain::category::{Category, CategoryPatch, NewCategory};
use community_domain::error::{CommunityError, ConflictError};
use community_domain::id::CategoryId;
use community_domain::status::Status;
use community_domain::time::now;

use crate::ports::CategoryRepository;

pub struct CategoryService<R> {
    repo: R,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// # Errors
    ///
    /// Returns [`CommunityError::Validation`] for a blank name and
    /// [`CommunityError::Conflict`] when the name is taken.
    pub async fn create(&self, category: NewCategory) -> Result<CategoryId, CommunityError> {
        category.validate()?;
        self.ensure_name_free(&category.name).await?;
        let id = self.repo.create_category(category, now()).await?;
        tracing::info!(category_id = %id, "category created");
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns [`CommunityError::NotFound`] for a missing category and
    /// [`CommunityError::Conflict`] when renaming onto a taken name.
    pub async fn update(&self, id: CategoryId, patch: CategoryPatch) -> Result<(), CommunityError> {
        let mut category = self.detail(id).await?;
        if let Some(name) = &patch.name {
            if *name != category.name {
                self.ensure_name_free(name).await?;
            }
        }
        patch.apply(&mut category)?;
        self.repo.update_category(category, now()).await
    }

    /// # Errors
    ///
    /// Returns [`CommunityError::NotFound`] for a missing category and
    /// [`CommunityError::Conflict`] while posts still reference it.
    pub async fn delete(&self, id: CategoryId) -> Result<(), CommunityError> {
        self.detail(id).await?;
        if self.repo.count_category_posts(id).await? > 0 {
            return Err(ConflictError::InvalidState("category still has posts").into());
        }
        self.repo.delete_category(id).await?;
        tracing::info!(category_id = %id, "category deleted");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list(&self, status: Status) -> Result<Vec<Category>, CommunityError> {
        self.repo.list_categories(status).await
    }

    /// # Errors
    ///
    /// Returns [`CommunityError::NotFound`] for a missing category.
    pub async fn detail(&self, id: CategoryId) -> Result<Category, CommunityError> {
        self.repo
            .find_category(id)
            .await?
            .ok_or_else(|| CommunityError::not_found("category", id))
    }

    async fn ensure_name_free(&self, name: &str) -> Result<(), CommunityError> {
        if self.repo.find_category_by_name(name).await?.is_some() {
            return Err(ConflictError::Duplicate {
                entity: "category",
                key: name.to_string(),
            }
            .into());
        }
        Ok(())
    }
}
