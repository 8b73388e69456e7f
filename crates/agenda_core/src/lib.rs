//! Core domain logic for the contact agenda.
//! This crate is the single source of truth for record rules and storage.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod transfer;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::record::{validate_record, Record, RecordId, RecordValidationError};
pub use repo::record_repo::{
    RecordRepository, RepoError, RepoResult, SqliteRecordRepository, WriteOutcome,
};
pub use service::agenda_service::{
    parse_selected_id, AgendaError, AgendaResult, AgendaService, RemoveAllReport,
};
pub use service::record_services::{RecordCreator, RecordDeleter, RecordGetter, RecordUpdater};
pub use transfer::csv::{
    export_csv, export_csv_file, import_csv, import_csv_file, ExportError, ImportError,
    ImportReport, RejectedRow, DEFAULT_EXPORT_FILE,
};

/// Minimal health-check API for front-end wiring checks.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
