//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- The authenticated user, from a Bearer token or the session cookie.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`rbac::RequireOperator`] -- Requires `operator` or `admin`.
//! - [`rbac::RequireAuth`] -- Requires any authenticated user.
//! - [`screen::ScreenUser`] / [`screen::ScreenWriter`] -- HTML variants that
//!   redirect to the login screen instead of answering with JSON.

pub mod auth;
pub mod rbac;
pub mod screen;
