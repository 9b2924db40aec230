//! Application services — use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod address_service;
pub mod audit_service;
pub mod auth_service;
pub mod blacklist_service;
pub mod catalog_service;
pub mod category_service;
pub mod comment_service;
pub mod favorite_service;
pub mod feedback_service;
pub mod follow_service;
pub mod history_service;
pub mod message_service;
pub mod pin_service;
pub mod post_service;
pub mod report_service;
pub mod search_service;
pub mod setting_service;
pub mod share_service;
pub mod tag_service;
pub mod user_service;

#[cfg(test)]
pub(crate) mod fakes;
