//! Inner join of reversals and payments on `reference = batch_id`.

use super::payment_repo::parse_payment_row;
use super::reversal_repo::parse_reversal_row;
use super::RepoResult;
use crate::model::ReversalPayment;
use rusqlite::Connection;

/// Returns every reversal/payment pair whose keys match, ordered by ids.
///
/// Exact, case-sensitive comparison; a reversal without a payment is absent.
pub fn join_reversals_with_payments(conn: &Connection) -> RepoResult<Vec<ReversalPayment>> {
    let mut stmt = conn.prepare(
        "SELECT
            r.id AS reversal_id,
            r.reference AS reversal_reference,
            r.name AS reversal_name,
            p.id AS payment_id,
            p.batch_id AS payment_batch_id
         FROM transaction_reversals AS r
         INNER JOIN payments AS p ON r.reference = p.batch_id
         ORDER BY r.id ASC, p.id ASC;",
    )?;

    let mut rows = stmt.query([])?;
    let mut pairs = Vec::new();
    while let Some(row) = rows.next()? {
        pairs.push(ReversalPayment {
            reversal: parse_reversal_row(
                row,
                "reversal_id",
                "reversal_reference",
                "reversal_name",
            )?,
            payment: parse_payment_row(row, "payment_id", "payment_batch_id")?,
        });
    }
    Ok(pairs)
}
