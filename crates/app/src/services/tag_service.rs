//! Tag service — tag catalog and post labelling.

use community_domain::error::{CommunityError, ConflictError, ForbiddenError, ValidationError};
use community_domain::id::{PostId, TagId, UserId};
use community_domain::page::{PageRequest, Paged};
use community_domain::tag::{Tag, TagSort, normalize_tag_name};
use community_domain::time::now;

use crate::ports::{PostRepository, TagRepository};

/// Tags returned by the hot list when the caller does not ask for a count.
pub const DEFAULT_HOT_LIMIT: i64 = 10;
const MAX_HOT_LIMIT: i64 = 50;

pub struct TagService<R> {
    repo: R,
}

impl<R: TagRepository + PostRepository> TagService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// # Errors
    ///
    /// Returns [`CommunityError::Validation`] for a blank name and
    /// [`CommunityError::Conflict`] when the name is taken.
    pub async fn create(&self, name: &str) -> Result<TagId, CommunityError> {
        let name = normalize_tag_name(name)?;
        if self.repo.find_tag_by_name(&name).await?.is_some() {
            return Err(ConflictError::Duplicate {
                entity: "tag",
                key: name,
            }
            .into());
        }
        self.repo.create_tag(name, now()).await
    }

    /// # Errors
    ///
    /// Returns [`CommunityError::NotFound`] for a missing tag.
    pub async fn delete(&self, id: TagId) -> Result<(), CommunityError> {
        if self.repo.find_tag(id).await?.is_none() {
            return Err(CommunityError::not_found("tag", id));
        }
        self.repo.delete_tag(id).await
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list(&self, sort: TagSort, page: PageRequest) -> Result<Paged<Tag>, CommunityError> {
        self.repo.list_tags(sort, page).await
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn hot(&self, limit: Option<i64>) -> Result<Vec<Tag>, CommunityError> {
        let limit = limit.unwrap_or(DEFAULT_HOT_LIMIT).clamp(1, MAX_HOT_LIMIT);
        self.repo.hot_tags(limit).await
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn by_post(&self, post: PostId) -> Result<Vec<Tag>, CommunityError> {
        self.repo.tags_for_post(post).await
    }

    /// Replace the tags of a post owned by `user`. Duplicate ids collapse.
    ///
    /// # Errors
    ///
    /// Returns [`CommunityError::NotFound`] for a missing post,
    /// [`CommunityError::Forbidden`] when `user` is not its author, and
    /// [`CommunityError::Validation`] when a tag id is unknown.
    pub async fn set_post_tags(
        &self,
        post: PostId,
        user: UserId,
        mut tags: Vec<TagId>,
    ) -> Result<(), CommunityError> {
        let found = self
            .repo
            .find_post(post)
            .await?
            .ok_or_else(|| CommunityError::not_found("post", post))?;
        if found.user_id != user {
            return Err(ForbiddenError::NotOwner("post").into());
        }

        tags.sort_unstable();
        tags.dedup();
        let wanted = i64::try_from(tags.len()).unwrap_or(i64::MAX);
        if !tags.is_empty() && self.repo.count_tags(tags.clone()).await? != wanted {
            return Err(ValidationError::Invalid {
                field: "tag_ids",
                reason: "unknown tag id",
            }
            .into());
        }
        self.repo.set_post_tags(post, tags).await
    }
}
