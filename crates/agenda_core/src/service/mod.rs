//! Core use-case services.
//!
//! # Responsibility
//! - Expose one narrow capability per CRUD verb.
//! - Run the validate-then-persist flow used by every front end.
//! - Keep presentation layers decoupled from storage details.

pub mod agenda_service;
pub mod record_services;
