//! Shared application state for axum handlers.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::FromRef;
use chrono::Duration;

use community_app::ports::Store;
use community_app::services::address_service::AddressService;
use community_app::services::audit_service::AuditService;
use community_app::services::auth_service::AuthService;
use community_app::services::blacklist_service::BlacklistService;
use community_app::services::catalog_service::CatalogService;
use community_app::services::category_service::CategoryService;
use community_app::services::comment_service::CommentService;
use community_app::services::favorite_service::FavoriteService;
use community_app::services::feedback_service::FeedbackService;
use community_app::services::follow_service::FollowService;
use community_app::services::history_service::HistoryService;
use community_app::services::message_service::MessageService;
use community_app::services::pin_service::PinService;
use community_app::services::post_service::PostService;
use community_app::services::report_service::ReportService;
use community_app::services::search_service::SearchService;
use community_app::services::setting_service::SettingService;
use community_app::services::share_service::ShareService;
use community_app::services::tag_service::TagService;
use community_app::services::user_service::UserService;

use crate::auth::TokenKeys;
use crate::hasher::Argon2Hasher;
use crate::notify::TracingCodeSender;
use crate::upload::UploadStore;

/// HTTP-side settings, resolved by the binary from its configuration.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub refresh_grace_secs: i64,
    pub share_ttl_secs: i64,
    pub upload_dir: PathBuf,
    pub public_prefix: String,
    pub share_base_url: String,
}

/// Application state shared across all axum handlers.
///
/// Generic over the storage adapter so handlers are statically dispatched.
/// `Clone` is implemented manually so `R` itself does not need to be cloned
/// per request; only the `Arc` wrappers are.
pub struct AppState<R> {
    pub auth: Arc<AuthService<R, Argon2Hasher>>,
    pub users: Arc<UserService<R, Argon2Hasher, TracingCodeSender>>,
    pub posts: Arc<PostService<R>>,
    pub comments: Arc<CommentService<R>>,
    pub favorites: Arc<FavoriteService<R>>,
    pub follows: Arc<FollowService<R>>,
    pub blacklist: Arc<BlacklistService<R>>,
    pub messages: Arc<MessageService<R>>,
    pub history: Arc<HistoryService<R>>,
    pub shares: Arc<ShareService<R>>,
    pub search: Arc<SearchService<R>>,
    pub feedback: Arc<FeedbackService<R>>,
    pub reports: Arc<ReportService<R>>,
    pub addresses: Arc<AddressService<R>>,
    pub pins: Arc<PinService<R>>,
    pub audits: Arc<AuditService<R>>,
    pub categories: Arc<CategoryService<R>>,
    pub tags: Arc<TagService<R>>,
    pub settings: Arc<SettingService<R>>,
    pub catalog: Arc<CatalogService<R>>,
    pub tokens: Arc<TokenKeys>,
    pub uploads: Arc<UploadStore>,
    pub share_base_url: Arc<str>,
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            auth: Arc::clone(&self.auth),
            users: Arc::clone(&self.users),
            posts: Arc::clone(&self.posts),
            comments: Arc::clone(&self.comments),
            favorites: Arc::clone(&self.favorites),
            follows: Arc::clone(&self.follows),
            blacklist: Arc::clone(&self.blacklist),
            messages: Arc::clone(&self.messages),
            history: Arc::clone(&self.history),
            shares: Arc::clone(&self.shares),
            search: Arc::clone(&self.search),
            feedback: Arc::clone(&self.feedback),
            reports: Arc::clone(&self.reports),
            addresses: Arc::clone(&self.addresses),
            pins: Arc::clone(&self.pins),
            audits: Arc::clone(&self.audits),
            categories: Arc::clone(&self.categories),
            tags: Arc::clone(&self.tags),
            settings: Arc::clone(&self.settings),
            catalog: Arc::clone(&self.catalog),
            tokens: Arc::clone(&self.tokens),
            uploads: Arc::clone(&self.uploads),
            share_base_url: Arc::clone(&self.share_base_url),
        }
    }
}

impl<R: Store> AppState<R> {
    /// Build every service over clones of one store.
    pub fn new(store: R, settings: HttpSettings) -> Self {
        let tokens = TokenKeys::new(
            settings.jwt_secret.as_bytes(),
            Duration::seconds(settings.token_ttl_secs),
            Duration::seconds(settings.refresh_grace_secs),
            Duration::seconds(settings.share_ttl_secs),
        );

        Self {
            auth: Arc::new(AuthService::new(store.clone(), Argon2Hasher)),
            users: Arc::new(UserService::new(
                store.clone(),
                Argon2Hasher,
                TracingCodeSender,
            )),
            posts: Arc::new(PostService::new(store.clone())),
            comments: Arc::new(CommentService::new(store.clone())),
            favorites: Arc::new(FavoriteService::new(store.clone())),
            follows: Arc::new(FollowService::new(store.clone())),
            blacklist: Arc::new(BlacklistService::new(store.clone())),
            messages: Arc::new(MessageService::new(store.clone())),
            history: Arc::new(HistoryService::new(store.clone())),
            shares: Arc::new(ShareService::new(store.clone())),
            search: Arc::new(SearchService::new(store.clone())),
            feedback: Arc::new(FeedbackService::new(store.clone())),
            reports: Arc::new(ReportService::new(store.clone())),
            addresses: Arc::new(AddressService::new(store.clone())),
            pins: Arc::new(PinService::new(store.clone())),
            audits: Arc::new(AuditService::new(store.clone())),
            categories: Arc::new(CategoryService::new(store.clone())),
            tags: Arc::new(TagService::new(store.clone())),
            settings: Arc::new(SettingService::new(store.clone())),
            catalog: Arc::new(CatalogService::new(store)),
            tokens: Arc::new(tokens),
            uploads: Arc::new(UploadStore::new(
                settings.upload_dir,
                settings.public_prefix,
            )),
            share_base_url: Arc::from(settings.share_base_url.trim_end_matches('/')),
        }
    }
}

impl<R> FromRef<AppState<R>> for Arc<TokenKeys> {
    fn from_ref(state: &AppState<R>) -> Self {
        Arc::clone(&state.tokens)
    }
}
