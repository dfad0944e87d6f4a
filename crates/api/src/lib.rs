//! HTTP surface of RallyControl: the server-rendered master-data screens,
//! the administrative console and the timing collaborator API.

pub mod auth;
pub mod config;
pub mod error;
pub mod flash;
pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod nav;
pub mod response;
pub mod router;
pub mod routes;
pub mod screens;
pub mod state;
pub mod templates;
