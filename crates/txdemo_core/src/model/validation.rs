//! Field constraints mirrored from the SQL schema.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum length of `transaction_reversals.reference`.
pub const REFERENCE_MAX_CHARS: usize = 50;
/// Maximum length of `transaction_reversals.name`.
pub const NAME_MAX_CHARS: usize = 100;
/// Maximum length of `payments.batch_id`.
pub const BATCH_ID_MAX_CHARS: usize = 50;

/// Validation failure for record fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    EmptyReference,
    ReferenceTooLong { chars: usize },
    NameTooLong { chars: usize },
    EmptyBatchId,
    BatchIdTooLong { chars: usize },
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyReference => write!(f, "reversal reference is required"),
            Self::ReferenceTooLong { chars } => write!(
                f,
                "reversal reference has {chars} chars; maximum is {REFERENCE_MAX_CHARS}"
            ),
            Self::NameTooLong { chars } => write!(
                f,
                "reversal name has {chars} chars; maximum is {NAME_MAX_CHARS}"
            ),
            Self::EmptyBatchId => write!(f, "payment batch id is required"),
            Self::BatchIdTooLong { chars } => write!(
                f,
                "payment batch id has {chars} chars; maximum is {BATCH_ID_MAX_CHARS}"
            ),
        }
    }
}

impl Error for RecordValidationError {}

/// Returns the length in Unicode scalar values, matching SQLite `length()`.
pub(crate) fn char_len(value: &str) -> usize {
    value.chars().count()
}
