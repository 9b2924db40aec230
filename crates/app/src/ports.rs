//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod activity;
pub mod address;
pub mod catalog;
pub mod comment;
pub mod message;
pub mod moderation;
pub mod post;
pub mod security;
pub mod social;
pub mod user;

pub use activity::{HistoryRepository, SearchLogRepository, ShareRepository};
pub use address::AddressRepository;
pub use catalog::{CatalogRepository, CategoryRepository, SettingRepository, TagRepository};
pub use comment::CommentRepository;
pub use message::MessageRepository;
pub use moderation::{AuditRepository, FeedbackRepository, PinRepository, ReportRepository};
pub use post::{FavoriteRepository, LikeRepository, PostRepository};
pub use security::{CodeSender, PasswordHasher};
pub use social::{BlacklistRepository, FollowRepository};
pub use user::{UserRepository, VerificationCodeRepository};

/// Every repository port at once, as implemented by a single storage adapter.
pub trait Store:
    UserRepository
    + VerificationCodeRepository
    + PostRepository
    + LikeRepository
    + FavoriteRepository
    + CommentRepository
    + FollowRepository
    + BlacklistRepository
    + MessageRepository
    + HistoryRepository
    + ShareRepository
    + SearchLogRepository
    + FeedbackRepository
    + ReportRepository
    + AddressRepository
    + PinRepository
    + AuditRepository
    + CategoryRepository
    + TagRepository
    + SettingRepository
    + CatalogRepository
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> Store for T where
    T: UserRepository
        + VerificationCodeRepository
        + PostRepository
        + LikeRepository
        + FavoriteRepository
        + CommentRepository
        + FollowRepository
        + BlacklistRepository
        + MessageRepository
        + HistoryRepository
        + ShareRepository
        + SearchLogRepository
        + FeedbackRepository
        + ReportRepository
        + AddressRepository
        + PinRepository
        + AuditRepository
        + CategoryRepository
        + TagRepository
        + SettingRepository
        + CatalogRepository
        + Clone
        + Send
        + Sync
        + 'static
{
}
