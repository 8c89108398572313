//! In-memory change tracking for fetched and staged records.
//!
//! # Responsibility
//! - Keep one tracked copy per stored key (identity resolution).
//! - Diff tracked copies against their originals to find pending writes.
//!
//! # Invariants
//! - Reads in `ReadMode::NoTracking` never register anything here.
//! - A tracked key is never re-read over: the in-memory copy wins until
//!   changes are accepted or the tracker is cleared.
//! - Accepting changes is the only path that moves `current` into `original`.

mod change_tracker;

pub use change_tracker::{ChangeTracker, EntryState, PendingChange};

use crate::model::payment::PaymentRecord;
use crate::model::reversal::ReversalRecord;

/// Explicit read policy passed to every fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Register fetched rows so later mutations are written on save.
    Tracked,
    /// Return detached snapshots; mutations to them are never persisted.
    NoTracking,
}

/// A record with a store-assigned surrogate key.
pub trait Entity: Clone + PartialEq {
    const NAME: &'static str;

    fn key(&self) -> Option<i64>;
    fn assign_key(&mut self, key: i64);
}

impl Entity for ReversalRecord {
    const NAME: &'static str = "transaction_reversal";

    fn key(&self) -> Option<i64> {
        self.id
    }

    fn assign_key(&mut self, key: i64) {
        self.id = Some(key);
    }
}

impl Entity for PaymentRecord {
    const NAME: &'static str = "payment";

    fn key(&self) -> Option<i64> {
        self.id
    }

    fn assign_key(&mut self, key: i64) {
        self.id = Some(key);
    }
}
