//! # community-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement every repository port trait defined in `community-app::ports`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations and seed reference data (sqlx embedded migrations)
//! - Map between domain types and database rows
//! - Keep denormalized counters consistent with relationship rows by running
//!   each toggle in a single transaction
//!
//! ## Dependency rule
//! Depends on `community-app` (for port traits) and `community-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod pool;

mod activity_repo;
mod address_repo;
mod catalog_repo;
mod category_repo;
mod comment_repo;
mod message_repo;
mod moderation_repo;
mod post_repo;
mod setting_repo;
mod social_repo;
mod store;
mod tag_repo;
mod ticket_repo;
mod user_repo;

pub use pool::{Config, Database};
pub use store::SqliteStore;
