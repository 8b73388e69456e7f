//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the record data access contract.
//! - Isolate SQLite query details from services and the application flow.
//!
//! # Invariants
//! - Repository APIs separate "executed, no match" (`WriteOutcome::NotFound`)
//!   from execution faults (`RepoError`).

pub mod record_repo;
