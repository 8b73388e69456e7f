//! Contact use-case flow.
//!
//! # Responsibility
//! - Turn raw user input into validated records.
//! - Route each request to the single-verb service that serves it.
//! - Return plain records and outcomes; presentation state lives elsewhere.
//!
//! # Invariants
//! - Invalid input never reaches storage.
//! - Every list call re-reads storage; nothing is cached between calls.
//! - `remove_all` is best-effort: one failing row does not stop the batch.

use crate::model::record::{validate_record, Record, RecordId, RecordValidationError};
use crate::repo::record_repo::{RecordRepository, RepoError, WriteOutcome};
use crate::service::record_services::{RecordCreator, RecordDeleter, RecordGetter, RecordUpdater};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure of one contact use-case.
#[derive(Debug)]
pub enum AgendaError {
    /// Input broke a field rule; storage was not touched.
    Validation(RecordValidationError),
    /// Update/delete request did not carry a usable row id.
    NoSelection(String),
    /// Storage failed while executing the request.
    Repo(RepoError),
}

impl Display for AgendaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NoSelection(raw) if raw.trim().is_empty() => write!(f, "no record selected"),
            Self::NoSelection(raw) => write!(f, "no record selected: invalid id `{raw}`"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

// Wrapping variants display the inner error, so only its cause is exposed.
impl Error for AgendaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => err.source(),
            Self::Repo(err) => err.source(),
            Self::NoSelection(_) => None,
        }
    }
}

impl From<RecordValidationError> for AgendaError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for AgendaError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub type AgendaResult<T> = Result<T, AgendaError>;

/// Summary of a best-effort remove-all batch.
#[derive(Debug, Default)]
pub struct RemoveAllReport {
    /// Rows deleted by this batch.
    pub removed: usize,
    /// Rows listed but already gone when their delete ran.
    pub not_found: usize,
    /// Rows whose delete failed, with the storage error text.
    pub failed: Vec<(RecordId, String)>,
}

impl RemoveAllReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Application flow over one repository.
pub struct AgendaService<R: RecordRepository> {
    repo: R,
}

impl<R: RecordRepository> AgendaService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and stores a new contact from raw input.
    pub fn add_contact(&self, name: &str, number: &str) -> AgendaResult<Record> {
        self.add_record(Record::new(name, number))
    }

    /// Validates and stores `record`, returning it with its assigned id.
    ///
    /// Any id already on `record` is ignored; storage assigns a fresh one.
    pub fn add_record(&self, mut record: Record) -> AgendaResult<Record> {
        if let Err(err) = validate_record(&record) {
            info!(
                "event=contact_add module=service status=rejected reason={}",
                err.code()
            );
            return Err(err.into());
        }

        record.id = RecordCreator::new(&self.repo).insert_record(&record)?;
        info!(
            "event=contact_add module=service status=ok id={}",
            record.id
        );
        Ok(record)
    }

    /// Lists every stored contact, freshly read.
    pub fn list_contacts(&self) -> AgendaResult<Vec<Record>> {
        Ok(RecordGetter::new(&self.repo).get_records()?)
    }

    /// Replaces name and number of the contact addressed by a raw id.
    ///
    /// Field rules are checked before the id, so an invalid edit is reported
    /// even when nothing is selected.
    pub fn update_contact(&self, id: &str, name: &str, number: &str) -> AgendaResult<WriteOutcome> {
        let mut record = Record::new(name, number);
        if let Err(err) = validate_record(&record) {
            info!(
                "event=contact_update module=service status=rejected reason={}",
                err.code()
            );
            return Err(err.into());
        }
        record.id = parse_selected_id(id)?;

        let outcome = RecordUpdater::new(&self.repo).update_record(&record)?;
        log_outcome("contact_update", record.id, outcome);
        Ok(outcome)
    }

    /// Removes the contact addressed by a raw id.
    pub fn remove_contact(&self, id: &str) -> AgendaResult<WriteOutcome> {
        let record = Record::with_id(parse_selected_id(id)?, "", "");
        let outcome = RecordDeleter::new(&self.repo).delete_record(&record)?;
        log_outcome("contact_remove", record.id, outcome);
        Ok(outcome)
    }

    /// Deletes every stored contact one row at a time.
    ///
    /// No transaction wraps the batch: a failing row is recorded in the report
    /// and the remaining rows are still attempted.
    pub fn remove_all(&self) -> AgendaResult<RemoveAllReport> {
        let records = RecordGetter::new(&self.repo).get_records()?;
        let deleter = RecordDeleter::new(&self.repo);
        let mut report = RemoveAllReport::default();

        for record in &records {
            match deleter.delete_record(record) {
                Ok(WriteOutcome::Applied) => report.removed += 1,
                Ok(WriteOutcome::NotFound(_)) => report.not_found += 1,
                Err(err) => report.failed.push((record.id, err.to_string())),
            }
        }

        if report.is_complete() {
            info!(
                "event=contact_remove_all module=service status=ok removed={} not_found={}",
                report.removed, report.not_found
            );
        } else {
            warn!(
                "event=contact_remove_all module=service status=partial removed={} not_found={} failed={}",
                report.removed,
                report.not_found,
                report.failed.len()
            );
        }
        Ok(report)
    }
}

/// Parses the id a presentation layer sends back for update/delete.
///
/// Accepts only a positive decimal integer, surrounding whitespace allowed.
pub fn parse_selected_id(raw: &str) -> AgendaResult<RecordId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(AgendaError::NoSelection(raw.to_string()));
    }

    match trimmed.parse::<RecordId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AgendaError::NoSelection(raw.to_string())),
    }
}

fn log_outcome(event: &str, id: RecordId, outcome: WriteOutcome) {
    match outcome {
        WriteOutcome::Applied => info!("event={event} module=service status=ok id={id}"),
        WriteOutcome::NotFound(_) => {
            warn!("event={event} module=service status=not_found id={id}")
        }
    }
}
