//! Pin service — the admin-curated stick and recommend lists.

use community_domain::error::CommunityError;
use community_domain::id::{PostId, UserId};
use community_domain::moderation::{PinEntry, PinKind};
use community_domain::page::{PageRequest, Paged};
use community_domain::relation::Toggle;
use community_domain::time::{Timestamp, now};

use crate::ports::{PinRepository, PostRepository};

pub struct PinService<R> {
    repo: R,
}

impl<R: PostRepository + PinRepository> PinService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Pin or unpin a post. `end_time` only matters when pinning.
    ///
    /// # Errors
    ///
    /// Returns [`CommunityError::NotFound`] when the post does not exist.
    pub async fn toggle(
        &self,
        kind: PinKind,
        post: PostId,
        admin: UserId,
        end_time: Option<Timestamp>,
    ) -> Result<Toggle, CommunityError> {
        if self.repo.find_post(post).await?.is_none() {
            return Err(CommunityError::not_found("post", post));
        }
        let toggle = self
            .repo
            .toggle_pin(kind, post, admin, end_time, now())
            .await?;
        tracing::info!(
            kind = kind.as_str(),
            post_id = %post,
            admin_id = %admin,
            pinned = toggle.is_on(),
            "pin toggled"
        );
        Ok(toggle)
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list(
        &self,
        kind: PinKind,
        page: PageRequest,
    ) -> Result<Paged<PinEntry>, CommunityError> {
        self.repo.list_pins(kind, now(), page).await
    }

    /// Only pins that have not expired count.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn check(&self, kind: PinKind, post: PostId) -> Result<bool, CommunityError> {
        self.repo.is_pinned(kind, post, now()).await
    }
}
