//! # community-domain
//!
//! Pure domain model for the community classifieds and social service.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps, paging
//! - Define **Users** and their public profile projections
//! - Define **Posts** with their typed extensions (second-hand, housing, jobs, rideshare)
//! - Define social records: comments, likes, favorites, follows, blacklist, messages
//! - Define moderation records: pins, audits, reports, feedback
//! - Define catalogs: categories, tags, settings, areas, versions, banners, communities
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod page;
pub mod status;
pub mod time;

pub mod activity;
pub mod address;
pub mod catalog;
pub mod category;
pub mod comment;
pub mod feedback;
pub mod geo;
pub mod message;
pub mod moderation;
pub mod post;
pub mod relation;
pub mod report;
pub mod setting;
pub mod tag;
pub mod upload;
pub mod user;
pub mod verification;
