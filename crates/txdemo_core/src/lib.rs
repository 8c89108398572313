//! Core logic for the transaction reversal demo.
//! This crate owns the record invariants, SQLite persistence, change tracking
//! and the reset/seed/join/update/verify flow.

pub mod context;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod tracking;

pub use context::{DataContext, SaveSummary};
pub use db::{DbError, DbResult, StoreConfig, StoreLocation};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::payment::PaymentRecord;
pub use model::reversal::ReversalRecord;
pub use model::validation::RecordValidationError;
pub use model::ReversalPayment;
pub use repo::payment_repo::{PaymentRepository, SqlitePaymentRepository};
pub use repo::reversal_repo::{ReversalRepository, SqliteReversalRepository};
pub use repo::{RepoError, RepoResult};
pub use service::transaction_flow::{
    run_transaction_flow, run_transaction_flow_with, FlowError, FlowOutcome, FlowPlan,
    FlowResult,
};
pub use tracking::{EntryState, ReadMode};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
