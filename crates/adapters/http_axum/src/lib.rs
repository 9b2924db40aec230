//! # community-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **JSON API** under `/api/<module>/<operation>`
//! - Wrap every answer in the `{code, msg, time, data}` envelope, errors included
//! - Issue and verify HS256 tokens, and expose the caller through the
//!   [`auth::AuthUser`], [`auth::MaybeUser`] and [`auth::AdminUser`] extractors
//! - Hash passwords with argon2 ([`hasher::Argon2Hasher`])
//! - Accept multipart uploads and serve them back from `/uploads`
//!
//! ## Dependency rule
//! Depends on `community-app` (for port traits and services) and
//! `community-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod auth;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod hasher;
pub mod notify;
pub mod router;
pub mod state;
pub mod upload;
