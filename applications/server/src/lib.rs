//! Starter Server Library
//!
//! HTTP backend exposing user management with request correlation, JSON
//! error envelopes, password hashing and JWT primitives.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
pub mod telemetry;

// Re-export commonly used types for convenience
pub use api::create_router;
pub use config::Settings;
pub use error::{Result, ServerError};
pub use services::{AuthService, UserService};
pub use state::AppState;
