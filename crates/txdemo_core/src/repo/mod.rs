//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define data access contracts per record type.
//! - Isolate SQL details from the change tracker and flow orchestration.
//! - Translate SQLite constraint failures into semantic errors.
//!
//! # Invariants
//! - Write paths validate records before SQL mutations.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - Lookups that must succeed return `NotFound`, never a default value.

use crate::db::DbError;
use crate::model::validation::RecordValidationError;
use rusqlite::ffi;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod join;
pub mod payment_repo;
pub mod reversal_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(RecordValidationError),
    Db(DbError),
    UniqueViolation {
        table: &'static str,
        column: &'static str,
        value: String,
    },
    NotFound {
        entity: &'static str,
        key: String,
    },
    InvalidKey {
        entity: &'static str,
        reason: &'static str,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UniqueViolation {
                table,
                column,
                value,
            } => write!(f, "duplicate value `{value}` for unique {table}.{column}"),
            Self::NotFound { entity, key } => write!(f, "{entity} not found: {key}"),
            Self::InvalidKey { entity, reason } => write!(f, "invalid {entity} key: {reason}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::UniqueViolation { .. }
            | Self::NotFound { .. }
            | Self::InvalidKey { .. }
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<RecordValidationError> for RepoError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Returns whether `err` is a `UNIQUE` constraint failure.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
