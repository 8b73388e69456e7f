//! Single-verb record services.
//!
//! # Responsibility
//! - Hand each use-case exactly one repository capability.
//!
//! # Invariants
//! - Services add no logic: results are the repository's, unchanged.

use crate::model::record::{Record, RecordId};
use crate::repo::record_repo::{RecordRepository, RepoResult, WriteOutcome};

/// Insert capability.
pub struct RecordCreator<R: RecordRepository> {
    repo: R,
}

impl<R: RecordRepository> RecordCreator<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Stores a record and returns its new id.
    pub fn insert_record(&self, record: &Record) -> RepoResult<RecordId> {
        self.repo.insert(record)
    }
}

/// List capability.
pub struct RecordGetter<R: RecordRepository> {
    repo: R,
}

impl<R: RecordRepository> RecordGetter<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Re-reads every stored record.
    pub fn get_records(&self) -> RepoResult<Vec<Record>> {
        self.repo.get_all()
    }
}

/// Update capability.
pub struct RecordUpdater<R: RecordRepository> {
    repo: R,
}

impl<R: RecordRepository> RecordUpdater<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Overwrites name and number of the row addressed by `record.id`.
    pub fn update_record(&self, record: &Record) -> RepoResult<WriteOutcome> {
        self.repo.update(record)
    }
}

/// Delete capability.
pub struct RecordDeleter<R: RecordRepository> {
    repo: R,
}

impl<R: RecordRepository> RecordDeleter<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Removes the row addressed by `record.id`.
    pub fn delete_record(&self, record: &Record) -> RepoResult<WriteOutcome> {
        self.repo.delete(record)
    }
}
