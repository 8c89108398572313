//! Unit-of-work context over the single store connection.
//!
//! # Responsibility
//! - Own the connection for the whole flow and release it on every exit path.
//! - Route reads through an explicit `ReadMode`.
//! - Persist staged inserts and tracked edits in one transaction.
//!
//! # Invariants
//! - `save_changes` is all-or-nothing; on error the trackers are untouched.
//! - No-tracking reads hit the store directly and never observe unsaved
//!   tracked edits.
//! - Schema reset and migration clear both trackers.

use crate::db::{self, DbResult, StoreConfig};
use crate::model::payment::PaymentRecord;
use crate::model::reversal::ReversalRecord;
use crate::model::ReversalPayment;
use crate::repo::join::join_reversals_with_payments;
use crate::repo::payment_repo::{PaymentRepository, SqlitePaymentRepository};
use crate::repo::reversal_repo::{ReversalRepository, SqliteReversalRepository};
use crate::repo::{RepoError, RepoResult};
use crate::tracking::{ChangeTracker, Entity, EntryState, PendingChange, ReadMode};
use log::{error, info};
use rusqlite::Connection;
use std::time::Instant;

/// Row counts written by one `save_changes` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveSummary {
    pub inserted: usize,
    pub updated: usize,
}

/// Store access with change tracking for reversals and payments.
pub struct DataContext {
    conn: Connection,
    reversals: ChangeTracker<ReversalRecord>,
    payments: ChangeTracker<PaymentRecord>,
}

impl DataContext {
    /// Connects to the configured store. The schema is left as found.
    pub fn open(config: &StoreConfig) -> DbResult<Self> {
        Ok(Self::from_connection(db::connect(config)?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            reversals: ChangeTracker::new(),
            payments: ChangeTracker::new(),
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Drops the whole schema. Returns whether anything existed.
    pub fn ensure_deleted(&mut self) -> DbResult<bool> {
        self.clear_tracking();
        db::ensure_deleted(&mut self.conn)
    }

    /// Applies pending migrations from the registry.
    pub fn migrate(&mut self) -> DbResult<()> {
        self.clear_tracking();
        db::migrate(&mut self.conn)
    }

    /// Stages a new reversal for insert on the next save.
    pub fn add_reversal(&mut self, record: ReversalRecord) -> RepoResult<()> {
        record.validate()?;
        self.reversals.add(record);
        Ok(())
    }

    /// Stages a new payment for insert on the next save.
    pub fn add_payment(&mut self, record: PaymentRecord) -> RepoResult<()> {
        record.validate()?;
        self.payments.add(record);
        Ok(())
    }

    pub fn reversals(&mut self, mode: ReadMode) -> RepoResult<Vec<ReversalRecord>> {
        let records = SqliteReversalRepository::new(&self.conn).list_all()?;
        Ok(track_all(&mut self.reversals, records, mode))
    }

    pub fn payments(&mut self, mode: ReadMode) -> RepoResult<Vec<PaymentRecord>> {
        let records = SqlitePaymentRepository::new(&self.conn).list_all()?;
        Ok(track_all(&mut self.payments, records, mode))
    }

    pub fn find_reversal_by_reference(
        &mut self,
        reference: &str,
        mode: ReadMode,
    ) -> RepoResult<Option<ReversalRecord>> {
        let found = SqliteReversalRepository::new(&self.conn).find_by_reference(reference)?;
        Ok(found.map(|record| track_one(&mut self.reversals, record, mode)))
    }

    /// Fetches the reversal with `reference`; a missing row is `NotFound`.
    pub fn first_reversal_by_reference(
        &mut self,
        reference: &str,
        mode: ReadMode,
    ) -> RepoResult<ReversalRecord> {
        let record = SqliteReversalRepository::new(&self.conn).get_by_reference(reference)?;
        Ok(track_one(&mut self.reversals, record, mode))
    }

    /// Inner join on `reference = batch_id`, each side read in its own mode.
    pub fn reversals_with_payments(
        &mut self,
        reversal_mode: ReadMode,
        payment_mode: ReadMode,
    ) -> RepoResult<Vec<ReversalPayment>> {
        let pairs = join_reversals_with_payments(&self.conn)?;
        Ok(pairs
            .into_iter()
            .map(|pair| ReversalPayment {
                reversal: track_one(&mut self.reversals, pair.reversal, reversal_mode),
                payment: track_one(&mut self.payments, pair.payment, payment_mode),
            })
            .collect())
    }

    /// Mutable access to a tracked reversal; `None` if `id` is not tracked.
    pub fn reversal_mut(&mut self, id: i64) -> Option<&mut ReversalRecord> {
        self.reversals.get_mut(id)
    }

    pub fn payment_mut(&mut self, id: i64) -> Option<&mut PaymentRecord> {
        self.payments.get_mut(id)
    }

    pub fn reversal_state(&self, id: i64) -> Option<EntryState> {
        self.reversals.state(id)
    }

    pub fn payment_state(&self, id: i64) -> Option<EntryState> {
        self.payments.state(id)
    }

    /// Writes staged inserts and tracked edits in a single transaction.
    ///
    /// # Side effects
    /// - Assigns store keys to inserted records.
    /// - Emits `save_changes` logging events with counts and duration.
    pub fn save_changes(&mut self) -> RepoResult<SaveSummary> {
        let started_at = Instant::now();
        self.reversals.detect_changes();
        self.payments.detect_changes();

        match self.write_pending() {
            Ok(summary) => {
                info!(
                    "event=save_changes module=context status=ok inserted={} updated={} duration_ms={}",
                    summary.inserted,
                    summary.updated,
                    started_at.elapsed().as_millis()
                );
                Ok(summary)
            }
            Err(err) => {
                error!(
                    "event=save_changes module=context status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Closes the connection, surfacing any close error.
    pub fn close(self) -> DbResult<()> {
        self.conn.close().map_err(|(_, err)| err.into())
    }

    fn write_pending(&mut self) -> RepoResult<SaveSummary> {
        let reversal_changes = self.reversals.pending_changes();
        let payment_changes = self.payments.pending_changes();
        if reversal_changes.is_empty() && payment_changes.is_empty() {
            return Ok(SaveSummary::default());
        }

        let mut summary = SaveSummary::default();
        let tx = self.conn.transaction()?;
        let reversal_keys = {
            let repo = SqliteReversalRepository::new(&tx);
            write_changes(
                &reversal_changes,
                |record| repo.insert(record),
                |record| repo.update(record),
                &mut summary,
            )?
        };
        let payment_keys = {
            let repo = SqlitePaymentRepository::new(&tx);
            write_changes(
                &payment_changes,
                |record| repo.insert(record),
                |record| repo.update(record),
                &mut summary,
            )?
        };
        tx.commit()?;

        self.reversals.accept_changes(&reversal_keys);
        self.payments.accept_changes(&payment_keys);
        Ok(summary)
    }

    /// Detaches every tracked record without touching the store.
    pub fn clear_tracking(&mut self) {
        self.reversals.clear();
        self.payments.clear();
    }
}

fn write_changes<T, I, U>(
    changes: &[PendingChange<'_, T>],
    insert: I,
    update: U,
    summary: &mut SaveSummary,
) -> RepoResult<Vec<(usize, i64)>>
where
    T: Entity,
    I: Fn(&T) -> RepoResult<i64>,
    U: Fn(&T) -> RepoResult<()>,
{
    let mut assigned = Vec::new();
    for change in changes {
        match change.state {
            EntryState::Added => {
                assigned.push((change.slot, insert(change.value)?));
                summary.inserted += 1;
            }
            EntryState::Modified => {
                if change.value.key() != change.key {
                    return Err(RepoError::InvalidKey {
                        entity: T::NAME,
                        reason: "tracked key was modified",
                    });
                }
                update(change.value)?;
                summary.updated += 1;
            }
            EntryState::Unchanged => {}
        }
    }
    Ok(assigned)
}

fn track_one<T: Entity>(tracker: &mut ChangeTracker<T>, value: T, mode: ReadMode) -> T {
    match mode {
        ReadMode::Tracked => tracker.attach(value),
        ReadMode::NoTracking => value,
    }
}

fn track_all<T: Entity>(
    tracker: &mut ChangeTracker<T>,
    values: Vec<T>,
    mode: ReadMode,
) -> Vec<T> {
    values
        .into_iter()
        .map(|value| track_one(tracker, value, mode))
        .collect()
}
