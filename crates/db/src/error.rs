//! Classification of storage errors the api layer maps to HTTP responses.

use std::fmt;

/// PostgreSQL SQLSTATE for `unique_violation`.
pub const UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL SQLSTATE for `foreign_key_violation`.
pub const FOREIGN_KEY_VIOLATION: &str = "23503";
/// PostgreSQL SQLSTATE for `check_violation`.
pub const CHECK_VIOLATION: &str = "23514";
/// PostgreSQL SQLSTATE for `not_null_violation`.
pub const NOT_NULL_VIOLATION: &str = "23502";

/// Which integrity rule rejected a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    ForeignKey,
    Check,
    NotNull,
}

impl ConstraintKind {
    fn from_code(code: &str) -> Option<Self> {
        match code {
            UNIQUE_VIOLATION => Some(Self::Unique),
            FOREIGN_KEY_VIOLATION => Some(Self::ForeignKey),
            CHECK_VIOLATION => Some(Self::Check),
            NOT_NULL_VIOLATION => Some(Self::NotNull),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unique => "unique",
            Self::ForeignKey => "foreign_key",
            Self::Check => "check",
            Self::NotNull => "not_null",
        }
    }
}

/// A write rejected by a database constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub kind: ConstraintKind,
    /// Constraint name, e.g. `uq_classes_name`. Empty for NOT NULL violations.
    pub constraint: String,
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.constraint.is_empty() {
            write!(f, "{} constraint violated", self.kind.as_str())
        } else {
            write!(f, "{} constraint {} violated", self.kind.as_str(), self.constraint)
        }
    }
}

/// Extract the constraint violation from a sqlx error, if it is one.
pub fn constraint_violation(err: &sqlx::Error) -> Option<ConstraintViolation> {
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };
    let kind = ConstraintKind::from_code(db_err.code()?.as_ref())?;
    Some(ConstraintViolation {
        kind,
        constraint: db_err.constraint().unwrap_or_default().to_string(),
    })
}

/// Whether the error is a violation of the named constraint.
pub fn is_constraint(err: &sqlx::Error, name: &str) -> bool {
    constraint_violation(err).is_some_and(|v| v.constraint == name)
}
