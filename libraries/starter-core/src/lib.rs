//! Starter Kit Core
//!
//! Domain types, repository traits, and error handling shared by the
//! storage layer and the HTTP server.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `User` plus its `CreateUser` / `UpdateUser` payloads
//! - **Repository Traits**: `Repository` (generic CRUD) and `UserRepository`
//! - **Error Handling**: Unified `CoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use starter_core::types::UpdateUser;
//!
//! // Only the supplied fields are changed by an update
//! let changes = UpdateUser {
//!     username: Some("alice".to_string()),
//!     ..UpdateUser::default()
//! };
//! assert!(!changes.is_empty());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod repository;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use repository::{Repository, UserRepository};
pub use types::{CreateUser, UpdateUser, User, UserId};
