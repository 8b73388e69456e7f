//! Contact record domain model and field validation.
//!
//! # Responsibility
//! - Define the canonical contact record shared by storage, CSV and CLI layers.
//! - Decide whether raw user input may become a stored record.
//!
//! # Invariants
//! - `id == 0` means "not yet persisted"; persisted ids are `AUTOINCREMENT` keys
//!   (>= 1), never reused after a delete.
//! - Field rules are enforced here only; storage accepts any text.
//! - Validation is total: it never panics, whatever the input.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Row identifier assigned by storage on insert.
pub type RecordId = i64;

/// Id carried by records that have not been inserted yet.
pub const UNASSIGNED_ID: RecordId = 0;

/// Minimum accepted name length, counted in characters.
pub const NAME_MIN_CHARS: usize = 3;

/// Exact accepted phone number length.
pub const NUMBER_DIGITS: usize = 9;

/// One contact entry.
///
/// Serializes as the flat `{ "id", "name", "number" }` structure handed to
/// presentation layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    pub number: String,
}

impl Record {
    /// Creates a transient record with an unassigned id.
    pub fn new(name: impl Into<String>, number: impl Into<String>) -> Self {
        Self::with_id(UNASSIGNED_ID, name, number)
    }

    /// Creates a record addressing an existing row.
    pub fn with_id(id: RecordId, name: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            number: number.into(),
        }
    }

    /// Returns whether storage has assigned this record an id.
    pub fn is_persisted(&self) -> bool {
        self.id > UNASSIGNED_ID
    }

    /// Validates name and number field rules.
    ///
    /// Shorthand for [`validate_record`].
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        validate_record(self)
    }
}

/// Field rule violated by a record, in check order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordValidationError {
    NameRequired,
    NameNotAlphabetic,
    NameTooShort,
    NumberRequired,
    NumberNotNumeric,
    NumberWrongLength,
}

impl RecordValidationError {
    /// Stable machine-readable code, safe to log.
    pub fn code(self) -> &'static str {
        match self {
            Self::NameRequired => "name_required",
            Self::NameNotAlphabetic => "name_not_alphabetic",
            Self::NameTooShort => "name_too_short",
            Self::NumberRequired => "number_required",
            Self::NumberNotNumeric => "number_not_numeric",
            Self::NumberWrongLength => "number_wrong_length",
        }
    }
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameRequired => write!(f, "name required"),
            Self::NameNotAlphabetic => write!(f, "name must be letters/spaces only"),
            Self::NameTooShort => write!(
                f,
                "name too short; minimum length is {NAME_MIN_CHARS} characters"
            ),
            Self::NumberRequired => write!(f, "number required"),
            Self::NumberNotNumeric => write!(f, "number must be digits only"),
            Self::NumberWrongLength => {
                write!(f, "number must be exactly {NUMBER_DIGITS} digits")
            }
        }
    }
}

impl Error for RecordValidationError {}

/// Checks a record against the contact field rules.
///
/// Rules run in a fixed order and the first failure wins:
/// name presence, name alphabet, name length, number presence,
/// number digits, number length.
pub fn validate_record(record: &Record) -> Result<(), RecordValidationError> {
    validate_name(&record.name)?;
    validate_number(&record.number)
}

fn validate_name(name: &str) -> Result<(), RecordValidationError> {
    if name.is_empty() {
        return Err(RecordValidationError::NameRequired);
    }

    // Whitespace-only names strip to nothing, which is not alphabetic.
    let mut letters = name.chars().filter(|ch| !ch.is_whitespace()).peekable();
    if letters.peek().is_none() || !letters.all(char::is_alphabetic) {
        return Err(RecordValidationError::NameNotAlphabetic);
    }

    if name.chars().count() < NAME_MIN_CHARS {
        return Err(RecordValidationError::NameTooShort);
    }

    Ok(())
}

fn validate_number(number: &str) -> Result<(), RecordValidationError> {
    if number.is_empty() {
        return Err(RecordValidationError::NumberRequired);
    }

    if !number.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(RecordValidationError::NumberNotNumeric);
    }

    if number.chars().count() != NUMBER_DIGITS {
        return Err(RecordValidationError::NumberWrongLength);
    }

    Ok(())
}
