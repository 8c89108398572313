//! Reversal repository contract and SQLite implementation.
//!
//! # Invariants
//! - `reference` uniqueness is enforced by the store and surfaced as
//!   `RepoError::UniqueViolation`.
//! - `update` requires a store-assigned id.

use super::{is_unique_violation, RepoError, RepoResult};
use crate::model::reversal::ReversalRecord;
use log::debug;
use rusqlite::{params, Connection, Row};

pub(crate) const ENTITY: &str = "transaction_reversal";

const REVERSAL_SELECT_SQL: &str = "SELECT id, reference, name FROM transaction_reversals";

/// Repository interface for reversal records.
pub trait ReversalRepository {
    /// Inserts an unsaved record and returns the assigned id.
    fn insert(&self, record: &ReversalRecord) -> RepoResult<i64>;
    /// Writes all mutable columns of a saved record.
    fn update(&self, record: &ReversalRecord) -> RepoResult<()>;
    fn find_by_reference(&self, reference: &str) -> RepoResult<Option<ReversalRecord>>;
    fn list_all(&self) -> RepoResult<Vec<ReversalRecord>>;

    /// Like `find_by_reference`, but a missing row is an error.
    fn get_by_reference(&self, reference: &str) -> RepoResult<ReversalRecord> {
        self.find_by_reference(reference)?
            .ok_or_else(|| RepoError::NotFound {
                entity: ENTITY,
                key: reference.to_string(),
            })
    }
}

/// SQLite-backed reversal repository.
pub struct SqliteReversalRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReversalRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ReversalRepository for SqliteReversalRepository<'_> {
    fn insert(&self, record: &ReversalRecord) -> RepoResult<i64> {
        record.validate()?;
        if record.id.is_some() {
            return Err(RepoError::InvalidKey {
                entity: ENTITY,
                reason: "insert requires an unsaved record",
            });
        }

        self.conn
            .execute(
                "INSERT INTO transaction_reversals (reference, name) VALUES (?1, ?2);",
                params![record.reference.as_str(), record.name.as_deref()],
            )
            .map_err(|err| {
                if is_unique_violation(&err) {
                    RepoError::UniqueViolation {
                        table: "transaction_reversals",
                        column: "reference",
                        value: record.reference.clone(),
                    }
                } else {
                    err.into()
                }
            })?;

        let id = self.conn.last_insert_rowid();
        debug!("event=row_insert module=repo entity={ENTITY} id={id}");
        Ok(id)
    }

    fn update(&self, record: &ReversalRecord) -> RepoResult<()> {
        record.validate()?;
        let id = record.id.ok_or(RepoError::InvalidKey {
            entity: ENTITY,
            reason: "update requires a store-assigned id",
        })?;

        let changed = self
            .conn
            .execute(
                "UPDATE transaction_reversals SET reference = ?1, name = ?2 WHERE id = ?3;",
                params![record.reference.as_str(), record.name.as_deref(), id],
            )
            .map_err(|err| {
                if is_unique_violation(&err) {
                    RepoError::UniqueViolation {
                        table: "transaction_reversals",
                        column: "reference",
                        value: record.reference.clone(),
                    }
                } else {
                    err.into()
                }
            })?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: ENTITY,
                key: id.to_string(),
            });
        }

        debug!("event=row_update module=repo entity={ENTITY} id={id}");
        Ok(())
    }

    fn find_by_reference(&self, reference: &str) -> RepoResult<Option<ReversalRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{REVERSAL_SELECT_SQL} WHERE reference = ?1 LIMIT 1;"))?;
        let mut rows = stmt.query([reference])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_reversal_row(row, "id", "reference", "name")?));
        }
        Ok(None)
    }

    fn list_all(&self) -> RepoResult<Vec<ReversalRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{REVERSAL_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_reversal_row(row, "id", "reference", "name")?);
        }
        Ok(records)
    }
}

/// Parses a reversal from named columns, rejecting rows that break field rules.
pub(crate) fn parse_reversal_row(
    row: &Row<'_>,
    id_col: &str,
    reference_col: &str,
    name_col: &str,
) -> RepoResult<ReversalRecord> {
    let id: i64 = row.get(id_col)?;
    let record = ReversalRecord {
        id: Some(id),
        reference: row.get(reference_col)?,
        name: row.get(name_col)?,
    };
    record
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("transaction_reversals.id={id}: {err}")))?;
    Ok(record)
}
