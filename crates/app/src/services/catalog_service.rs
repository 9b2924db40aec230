//! Catalog service — reference data and the home feed.

use community_domain::catalog::{AppVersion, Area, Banner, HomeFeed, NearbyCommunity};
use community_domain::category::Category;
use community_domain::error::{CommunityError, ValidationError};
use community_domain::geo::{Point, rank_by_distance};
use community_domain::status::Status;

use crate::ports::{CatalogRepository, CategoryRepository, PostRepository};

/// Banners shown on the home screen.
pub const HOME_BANNERS: i64 = 5;
/// Latest posts shown on the home screen.
pub const HOME_POSTS: i64 = 10;

pub struct CatalogService<R> {
    repo: R,
}

impl<R: CatalogRepository + CategoryRepository + PostRepository> CatalogService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn areas(&self, parent: i64) -> Result<Vec<Area>, CommunityError> {
        self.repo.list_areas(parent).await
    }

    /// # Errors
    ///
    /// Returns [`CommunityError::Validation`] when `platform` is blank.
    pub async fn latest_version(&self, platform: &str) -> Result<Option<AppVersion>, CommunityError> {
        if platform.trim().is_empty() {
            return Err(ValidationError::Required("platform").into());
        }
        self.repo.latest_version(platform.trim()).await
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn communities(
        &self,
        origin: Option<Point>,
    ) -> Result<Vec<NearbyCommunity>, CommunityError> {
        let communities = self.repo.list_communities().await?;
        Ok(rank_by_distance(communities, origin))
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn banners(&self) -> Result<Vec<Banner>, CommunityError> {
        self.repo.list_banners(None).await
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn categories(&self) -> Result<Vec<Category>, CommunityError> {
        self.repo.list_categories(Status::Normal).await
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn home(&self) -> Result<HomeFeed, CommunityError> {
        Ok(HomeFeed {
            banners: self.repo.list_banners(Some(HOME_BANNERS)).await?,
            categories: self.categories().await?,
            posts: self.repo.latest_posts(HOME_POSTS).await?,
        })
    }
}
