//! Catalog ports: categories, tags, site settings, and read-only reference data.

use std::future::Future;

use community_domain::catalog::{AppVersion, Area, Banner, Community};
use community_domain::category::{Category, NewCategory};
use community_domain::error::CommunityError;
use community_domain::id::{CategoryId, PostId, SettingId, TagId};
use community_domain::page::{PageRequest, Paged};
use community_domain::setting::{NewSetting, Setting, SettingValue};
use community_domain::status::Status;
use community_domain::tag::{Tag, TagSort};
use community_domain::time::Timestamp;

pub trait CategoryRepository {
    fn create_category(
        &self,
        category: NewCategory,
        at: Timestamp,
    ) -> impl Future<Output = Result<CategoryId, CommunityError>> + Send;

    fn find_category(
        &self,
        id: CategoryId,
    ) -> impl Future<Output = Result<Option<Category>, CommunityError>> + Send;

    fn find_category_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Category>, CommunityError>> + Send;

    /// Persist the editable fields of `category`.
    fn update_category(
        &self,
        category: Category,
        at: Timestamp,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send;

    fn delete_category(
        &self,
        id: CategoryId,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send;

    /// Posts of any status referencing the category.
    fn count_category_posts(
        &self,
        id: CategoryId,
    ) -> impl Future<Output = Result<i64, CommunityError>> + Send;

    /// Categories with `status`, by `sort` descending then id.
    fn list_categories(
        &self,
        status: Status,
    ) -> impl Future<Output = Result<Vec<Category>, CommunityError>> + Send;
}

pub trait TagRepository {
    fn create_tag(
        &self,
        name: String,
        at: Timestamp,
    ) -> impl Future<Output = Result<TagId, CommunityError>> + Send;

    fn find_tag(&self, id: TagId)
    -> impl Future<Output = Result<Option<Tag>, CommunityError>> + Send;

    fn find_tag_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Tag>, CommunityError>> + Send;

    /// Remove the tag together with its post links, atomically.
    fn delete_tag(&self, id: TagId) -> impl Future<Output = Result<(), CommunityError>> + Send;

    fn list_tags(
        &self,
        sort: TagSort,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<Tag>, CommunityError>> + Send;

    /// Tags with at least one post, most used first.
    fn hot_tags(&self, limit: i64) -> impl Future<Output = Result<Vec<Tag>, CommunityError>> + Send;

    fn tags_for_post(
        &self,
        post: PostId,
    ) -> impl Future<Output = Result<Vec<Tag>, CommunityError>> + Send;

    /// How many of `ids` exist.
    fn count_tags(
        &self,
        ids: Vec<TagId>,
    ) -> impl Future<Output = Result<i64, CommunityError>> + Send;

    /// Replace the post's links with `tags` and recount every tag whose
    /// links changed, atomically.
    fn set_post_tags(
        &self,
        post: PostId,
        tags: Vec<TagId>,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send;
}

pub trait SettingRepository {
    /// Settings of any status, optionally restricted to one group,
    /// by `sort` descending then id.
    fn list_settings(
        &self,
        group: Option<String>,
    ) -> impl Future<Output = Result<Vec<Setting>, CommunityError>> + Send;

    fn find_setting(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Setting>, CommunityError>> + Send;

    fn create_setting(
        &self,
        setting: NewSetting,
        at: Timestamp,
    ) -> impl Future<Output = Result<SettingId, CommunityError>> + Send;

    /// Write every value in one transaction; returns how many rows changed.
    fn update_setting_values(
        &self,
        values: Vec<SettingValue>,
        at: Timestamp,
    ) -> impl Future<Output = Result<u64, CommunityError>> + Send;

    /// Returns `false` when no setting had that name.
    fn delete_setting(&self, name: &str)
    -> impl Future<Output = Result<bool, CommunityError>> + Send;
}

/// Reference data maintained out of band.
pub trait CatalogRepository {
    /// Children of area `parent`, by `sort` then id.
    fn list_areas(&self, parent: i64)
    -> impl Future<Output = Result<Vec<Area>, CommunityError>> + Send;

    /// Newest visible version for a platform.
    fn latest_version(
        &self,
        platform: &str,
    ) -> impl Future<Output = Result<Option<AppVersion>, CommunityError>> + Send;

    /// Visible banners by weight, optionally capped.
    fn list_banners(
        &self,
        limit: Option<i64>,
    ) -> impl Future<Output = Result<Vec<Banner>, CommunityError>> + Send;

    fn list_communities(&self)
    -> impl Future<Output = Result<Vec<Community>, CommunityError>> + Send;
}
