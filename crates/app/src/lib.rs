//! # community-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - one repository trait per resource (`UserRepository`, `PostRepository`,
//!     `FollowRepository`, `AuditRepository`, …)
//!   - `PasswordHasher` — one-way password hashing
//!   - `CodeSender` — delivery of verification codes
//! - Define **driving/inbound ports** as use-case structs:
//!   - one service per resource (`PostService`, `FollowService`, `AuditService`, …)
//! - Own the policy around each write: ownership checks, self-relationship
//!   rules, blacklist guards, and whether a notification is due
//!
//! Multi-row writes (a toggle and its counters, a comment and its notice)
//! are handed to the repository as a single call so the adapter can run them
//! in one transaction.
//!
//! ## Dependency rule
//! Depends on `community-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
