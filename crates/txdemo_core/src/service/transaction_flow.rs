//! Reset, seed, join, update and verify against one data context.
//!
//! # Responsibility
//! - Run the five steps strictly in order, printing one status line per
//!   milestone.
//! - Distinguish a persisted update from a name mismatch without treating the
//!   mismatch as an error.
//!
//! # Invariants
//! - Any persistence failure aborts the flow; there are no retries.
//! - Payments are joined in `NoTracking` mode and never written back.
//! - Only the tracked reversal copy is updated.

use crate::context::DataContext;
use crate::db::DbError;
use crate::model::payment::PaymentRecord;
use crate::model::reversal::ReversalRecord;
use crate::model::validation::RecordValidationError;
use crate::repo::RepoError;
use crate::tracking::ReadMode;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, Write};

pub const DEFAULT_REFERENCE: &str = "TRX12345";
pub const DEFAULT_INITIAL_NAME: &str = "Old Name";
pub const DEFAULT_UPDATED_NAME: &str = "Updated Name";

pub const MSG_DATABASE_DELETED: &str = "Database deleted.";
pub const MSG_DATABASE_CREATED: &str = "Database created with migrations.";
pub const MSG_ENTITIES_ADDED: &str = "Entities have been successfully added to the database.";
pub const MSG_ENTITIES_UPDATED: &str = "Entities have been successfully updated in the database.";

pub type FlowResult<T> = Result<T, FlowError>;

/// Fatal failure of the flow.
#[derive(Debug)]
pub enum FlowError {
    Db(DbError),
    Repo(RepoError),
    /// An expected record was absent from a join or fetch.
    NotFound(String),
    Io(io::Error),
}

impl Display for FlowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "database error: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::NotFound(message) => write!(f, "not found: {message}"),
            Self::Io(err) => write!(f, "failed to write status line: {err}"),
        }
    }
}

impl Error for FlowError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}

impl From<DbError> for FlowError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for FlowError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<RecordValidationError> for FlowError {
    fn from(value: RecordValidationError) -> Self {
        Self::Repo(RepoError::Validation(value))
    }
}

impl From<io::Error> for FlowError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Values seeded and compared by the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowPlan {
    pub reference: String,
    pub initial_name: String,
    pub updated_name: String,
}

impl Default for FlowPlan {
    fn default() -> Self {
        Self {
            reference: DEFAULT_REFERENCE.to_string(),
            initial_name: DEFAULT_INITIAL_NAME.to_string(),
            updated_name: DEFAULT_UPDATED_NAME.to_string(),
        }
    }
}

/// Final verification result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    Updated,
    NameMismatch { actual: Option<String> },
}

impl FlowOutcome {
    /// Console line reported for this outcome.
    pub fn message(&self) -> String {
        match self {
            Self::Updated => MSG_ENTITIES_UPDATED.to_string(),
            Self::NameMismatch { actual } => format!(
                "Entities have not been updated in the database., Name in the DB is {}",
                actual.as_deref().unwrap_or_default()
            ),
        }
    }
}

/// Runs the flow with `FlowPlan::default()`.
pub fn run_transaction_flow(
    context: &mut DataContext,
    out: &mut impl Write,
) -> FlowResult<FlowOutcome> {
    run_transaction_flow_with(context, &FlowPlan::default(), out)
}

/// Runs reset, seed, join, update and verify in order.
///
/// # Errors
/// - `FlowError::Db` when reset or migration fails.
/// - `FlowError::Repo` for validation, uniqueness and write failures.
/// - `FlowError::NotFound` when the seeded pair or the re-fetched reversal is
///   missing.
pub fn run_transaction_flow_with(
    context: &mut DataContext,
    plan: &FlowPlan,
    out: &mut impl Write,
) -> FlowResult<FlowOutcome> {
    let existed = context.ensure_deleted()?;
    info!("event=flow_step module=service step=reset status=ok existed={existed}");
    writeln!(out, "{MSG_DATABASE_DELETED}")?;

    context.migrate()?;
    writeln!(out, "{MSG_DATABASE_CREATED}")?;

    context.add_reversal(ReversalRecord::new(
        plan.reference.as_str(),
        Some(plan.initial_name.clone()),
    )?)?;
    context.add_payment(PaymentRecord::new(plan.reference.as_str())?)?;
    let seeded = context.save_changes()?;
    info!(
        "event=flow_step module=service step=seed status=ok inserted={}",
        seeded.inserted
    );
    writeln!(out, "{MSG_ENTITIES_ADDED}")?;

    let pairs = context.reversals_with_payments(ReadMode::Tracked, ReadMode::NoTracking)?;
    info!(
        "event=flow_step module=service step=join status=ok pairs={}",
        pairs.len()
    );
    let reversal_id = pairs
        .iter()
        .find(|pair| pair.reversal.reference == plan.reference)
        .and_then(|pair| pair.reversal.id)
        .ok_or_else(|| {
            FlowError::NotFound(format!(
                "no reversal/payment pair for reference {}",
                plan.reference
            ))
        })?;

    context
        .reversal_mut(reversal_id)
        .ok_or_else(|| FlowError::NotFound(format!("tracked reversal id {reversal_id}")))?
        .rename(plan.updated_name.as_str());
    let updated = context.save_changes()?;
    info!(
        "event=flow_step module=service step=update status=ok updated={}",
        updated.updated
    );
    writeln!(out, "{MSG_ENTITIES_UPDATED}")?;

    let stored = context.first_reversal_by_reference(&plan.reference, ReadMode::Tracked)?;
    let outcome = if names_match(stored.name.as_deref(), &plan.updated_name) {
        info!("event=flow_step module=service step=verify status=ok");
        FlowOutcome::Updated
    } else {
        warn!("event=flow_step module=service step=verify status=mismatch");
        FlowOutcome::NameMismatch {
            actual: stored.name,
        }
    };
    writeln!(out, "{}", outcome.message())?;

    Ok(outcome)
}

/// Case-insensitive name comparison used only for the final check.
pub fn names_match(stored: Option<&str>, expected: &str) -> bool {
    match stored {
        Some(name) => name.to_lowercase() == expected.to_lowercase(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{names_match, FlowOutcome};

    #[test]
    fn names_match_ignores_case() {
        assert!(names_match(Some("UPDATED name"), "Updated Name"));
        assert!(names_match(Some("ÄBC"), "äbc"));
        assert!(!names_match(Some("Updated Name "), "Updated Name"));
        assert!(!names_match(None, "Updated Name"));
    }

    #[test]
    fn mismatch_message_includes_stored_name() {
        let outcome = FlowOutcome::NameMismatch {
            actual: Some("Old Name".to_string()),
        };
        assert_eq!(
            outcome.message(),
            "Entities have not been updated in the database., Name in the DB is Old Name"
        );
        let empty = FlowOutcome::NameMismatch { actual: None };
        assert!(empty.message().ends_with("Name in the DB is "));
    }
}
