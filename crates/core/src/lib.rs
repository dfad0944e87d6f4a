//! Database-free building blocks shared by the db and api crates.

pub mod choices;
pub mod error;
pub mod forms;
pub mod labels;
pub mod roles;
pub mod types;
