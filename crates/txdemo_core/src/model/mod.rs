//! Domain records for the transaction reversal demo.
//!
//! # Responsibility
//! - Define the two persisted record shapes and their join pair.
//! - Own field-level validation shared by repositories and the change tracker.
//!
//! # Invariants
//! - `id` is `None` until the store assigns a surrogate key on insert.
//! - Reversal and payment are related only logically via
//!   `reversal.reference == payment.batch_id`; no foreign key exists.

pub mod payment;
pub mod reversal;
pub mod validation;

use payment::PaymentRecord;
use reversal::ReversalRecord;
use serde::{Deserialize, Serialize};

/// One row of the inner join `reference = batch_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReversalPayment {
    pub reversal: ReversalRecord,
    pub payment: PaymentRecord,
}
