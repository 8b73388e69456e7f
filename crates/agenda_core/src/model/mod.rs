//! Contact domain model.
//!
//! # Responsibility
//! - Define the record shape used by every other layer.
//! - Own the field rules deciding what input may be persisted.
//!
//! # Invariants
//! - Every persisted record is addressed by its storage-assigned `RecordId`.

pub mod record;
