//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate context calls into the fixed reset/seed/join/update/verify
//!   sequence.
//! - Keep console wording out of the storage layers.

pub mod transaction_flow;
