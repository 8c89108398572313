//! Transaction reversal record.
//!
//! # Invariants
//! - `reference` is required, at most 50 chars, and unique across the table.
//! - `name` is optional and at most 100 chars.

use super::validation::{char_len, RecordValidationError, NAME_MAX_CHARS, REFERENCE_MAX_CHARS};
use serde::{Deserialize, Serialize};

/// A reversal of an earlier transaction, keyed by its business reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReversalRecord {
    /// Store-assigned surrogate key. `None` before the first insert.
    pub id: Option<i64>,
    pub reference: String,
    pub name: Option<String>,
}

impl ReversalRecord {
    /// Creates an unsaved reversal and validates its fields.
    pub fn new(
        reference: impl Into<String>,
        name: Option<String>,
    ) -> Result<Self, RecordValidationError> {
        let record = Self {
            id: None,
            reference: reference.into(),
            name,
        };
        record.validate()?;
        Ok(record)
    }

    /// Checks field constraints without touching storage.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.reference.is_empty() {
            return Err(RecordValidationError::EmptyReference);
        }
        let reference_chars = char_len(&self.reference);
        if reference_chars > REFERENCE_MAX_CHARS {
            return Err(RecordValidationError::ReferenceTooLong {
                chars: reference_chars,
            });
        }
        if let Some(name) = self.name.as_deref() {
            let name_chars = char_len(name);
            if name_chars > NAME_MAX_CHARS {
                return Err(RecordValidationError::NameTooLong { chars: name_chars });
            }
        }
        Ok(())
    }

    /// Replaces the display name.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }
}

#[cfg(test)]
mod tests {
    use super::ReversalRecord;
    use crate::model::validation::RecordValidationError;

    #[test]
    fn new_rejects_empty_reference() {
        let err = ReversalRecord::new("", None).unwrap_err();
        assert_eq!(err, RecordValidationError::EmptyReference);
    }

    #[test]
    fn new_rejects_overlong_fields() {
        let err = ReversalRecord::new("R".repeat(51), None).unwrap_err();
        assert_eq!(err, RecordValidationError::ReferenceTooLong { chars: 51 });

        let err = ReversalRecord::new("TRX1", Some("n".repeat(101))).unwrap_err();
        assert_eq!(err, RecordValidationError::NameTooLong { chars: 101 });
    }

    #[test]
    fn limits_count_chars_not_bytes() {
        let record = ReversalRecord::new("é".repeat(50), Some("ü".repeat(100))).unwrap();
        assert!(record.id.is_none());
    }

    #[test]
    fn rename_sets_name() {
        let mut record = ReversalRecord::new("TRX1", None).unwrap();
        record.rename("Fresh");
        assert_eq!(record.name.as_deref(), Some("Fresh"));
    }
}
