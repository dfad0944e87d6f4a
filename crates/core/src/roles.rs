//! Well-known role name constants.
//!
//! These must match the `ck_users_role` check constraint in
//! `20250301000002_create_users_table.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_OPERATOR: &str = "operator";
pub const ROLE_VIEWER: &str = "viewer";

/// All valid roles. New users default to [`ROLE_OPERATOR`].
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_OPERATOR, ROLE_VIEWER];

/// Role assigned when none is given on user creation.
pub const DEFAULT_ROLE: &str = ROLE_OPERATOR;

/// Whether the role may write master data and timing records.
pub fn can_write(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_OPERATOR
}
