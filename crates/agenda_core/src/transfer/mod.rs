//! Bulk record transfer in and out of the agenda.
//!
//! # Responsibility
//! - Import contacts from CSV through the same validate+insert path as
//!   manual entry.
//! - Export every stored contact to CSV.

pub mod csv;
