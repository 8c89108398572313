//! SQLite storage bootstrap, schema reset and migration entry points.
//!
//! # Responsibility
//! - Open and configure SQLite connections from `StoreConfig`.
//! - Drop the whole schema and rebuild it from the migration registry.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - `ensure_deleted` leaves `user_version = 0` and no user objects behind.
//! - Data access must not happen before `migrate` succeeds.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod config;
pub mod migrations;
mod open;
mod reset;

pub use config::{StoreConfig, StoreLocation, DEFAULT_DATABASE_FILE};
pub use migrations::migrate;
pub use open::{connect, open_db, open_db_in_memory};
pub use reset::ensure_deleted;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
