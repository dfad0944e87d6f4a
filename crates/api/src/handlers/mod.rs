//! Request handlers.
//!
//! - [`dashboard`] and [`screens`] render the server-side HTML screens.
//! - [`auth`] serves both the JSON login and the login/logout screens.
//! - [`console`] and [`timing`] are the JSON endpoints under `/api/v1`.
//!
//! Handlers delegate to the repositories in `rallycontrol_db` and map errors
//! via [`AppError`](crate::error::AppError) (JSON) or
//! [`HtmlError`](crate::error::HtmlError) (screens).

pub mod auth;
pub mod console;
pub mod dashboard;
pub mod input;
pub mod screens;
pub mod timing;
