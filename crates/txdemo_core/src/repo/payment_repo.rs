//! Payment repository contract and SQLite implementation.

use super::{RepoError, RepoResult};
use crate::model::payment::PaymentRecord;
use log::debug;
use rusqlite::{params, Connection, Row};

pub(crate) const ENTITY: &str = "payment";

/// Repository interface for payment records.
pub trait PaymentRepository {
    fn insert(&self, record: &PaymentRecord) -> RepoResult<i64>;
    fn update(&self, record: &PaymentRecord) -> RepoResult<()>;
    fn list_all(&self) -> RepoResult<Vec<PaymentRecord>>;
}

/// SQLite-backed payment repository.
pub struct SqlitePaymentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePaymentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PaymentRepository for SqlitePaymentRepository<'_> {
    fn insert(&self, record: &PaymentRecord) -> RepoResult<i64> {
        record.validate()?;
        if record.id.is_some() {
            return Err(RepoError::InvalidKey {
                entity: ENTITY,
                reason: "insert requires an unsaved record",
            });
        }

        self.conn.execute(
            "INSERT INTO payments (batch_id) VALUES (?1);",
            [record.batch_id.as_str()],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("event=row_insert module=repo entity={ENTITY} id={id}");
        Ok(id)
    }

    fn update(&self, record: &PaymentRecord) -> RepoResult<()> {
        record.validate()?;
        let id = record.id.ok_or(RepoError::InvalidKey {
            entity: ENTITY,
            reason: "update requires a store-assigned id",
        })?;

        let changed = self.conn.execute(
            "UPDATE payments SET batch_id = ?1 WHERE id = ?2;",
            params![record.batch_id.as_str(), id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: ENTITY,
                key: id.to_string(),
            });
        }

        debug!("event=row_update module=repo entity={ENTITY} id={id}");
        Ok(())
    }

    fn list_all(&self) -> RepoResult<Vec<PaymentRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, batch_id FROM payments ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_payment_row(row, "id", "batch_id")?);
        }
        Ok(records)
    }
}

pub(crate) fn parse_payment_row(
    row: &Row<'_>,
    id_col: &str,
    batch_id_col: &str,
) -> RepoResult<PaymentRecord> {
    let id: i64 = row.get(id_col)?;
    let record = PaymentRecord {
        id: Some(id),
        batch_id: row.get(batch_id_col)?,
    };
    record
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("payments.id={id}: {err}")))?;
    Ok(record)
}
