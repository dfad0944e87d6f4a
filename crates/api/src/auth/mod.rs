//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation and validation.
//! - [`cookies`] -- `Cookie` header parsing and `Set-Cookie` construction.

pub mod cookies;
pub mod jwt;
pub mod password;
