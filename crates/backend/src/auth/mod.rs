//! Authentication module for Google sign-in with JWT session cookies.
//!
//! This module provides:
//! - Google OAuth authorization-code flow for user login
//! - JWT session token creation and validation
//! - `require_session` / `require_auth` middleware for protecting routes
//! - Optional email allowlist validation

pub mod google;
mod handlers;
pub(crate) mod jwt;
mod middleware;
pub mod types;

pub use google::{GoogleProvider, IdentityProvider};
pub use handlers::{auth_callback, auth_login, auth_logout, auth_me};
pub use middleware::{
    build_auth_cookie, clear_cookie, extract_auth_user, extract_cookie, require_auth,
    require_session,
};
