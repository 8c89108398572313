//! Payment record grouped by batch id.

use super::validation::{char_len, RecordValidationError, BATCH_ID_MAX_CHARS};
use serde::{Deserialize, Serialize};

/// A payment whose `batch_id` may match a reversal `reference`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Store-assigned surrogate key. `None` before the first insert.
    pub id: Option<i64>,
    /// Serialized as `batchId` to match external naming.
    #[serde(rename = "batchId")]
    pub batch_id: String,
}

impl PaymentRecord {
    pub fn new(batch_id: impl Into<String>) -> Result<Self, RecordValidationError> {
        let record = Self {
            id: None,
            batch_id: batch_id.into(),
        };
        record.validate()?;
        Ok(record)
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.batch_id.is_empty() {
            return Err(RecordValidationError::EmptyBatchId);
        }
        let chars = char_len(&self.batch_id);
        if chars > BATCH_ID_MAX_CHARS {
            return Err(RecordValidationError::BatchIdTooLong { chars });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::PaymentRecord;
    use crate::model::validation::RecordValidationError;

    #[test]
    fn new_validates_batch_id() {
        assert_eq!(
            PaymentRecord::new("").unwrap_err(),
            RecordValidationError::EmptyBatchId
        );
        assert_eq!(
            PaymentRecord::new("B".repeat(51)).unwrap_err(),
            RecordValidationError::BatchIdTooLong { chars: 51 }
        );
        assert!(PaymentRecord::new("B".repeat(50)).is_ok());
    }
}
