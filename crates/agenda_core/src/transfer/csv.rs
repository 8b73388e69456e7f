//! CSV import/export of contact records.
//!
//! # Responsibility
//! - Read `NOMBRE,TELEFONO` files into validated, stored records.
//! - Write `id,name,number` files from storage.
//!
//! # Invariants
//! - A header mismatch or malformed row aborts the import before any insert.
//! - Rows breaking a field rule are skipped and reported; the rest are stored.
//! - Export truncates an existing target file.

use crate::model::record::Record;
use crate::repo::record_repo::RecordRepository;
use crate::service::agenda_service::{AgendaError, AgendaService};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use log::{info, warn};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Header column holding the contact name.
pub const IMPORT_NAME_COLUMN: &str = "NOMBRE";
/// Header column holding the phone number.
pub const IMPORT_NUMBER_COLUMN: &str = "TELEFONO";
/// Header written on export.
pub const EXPORT_HEADER: [&str; 3] = ["id", "name", "number"];
/// Export target used when the caller does not name one.
pub const DEFAULT_EXPORT_FILE: &str = "output.csv";

#[derive(Debug, Deserialize)]
struct ImportRow {
    #[serde(rename = "NOMBRE")]
    name: String,
    #[serde(rename = "TELEFONO")]
    number: String,
}

/// A CSV row skipped because it broke a field rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    /// 1-based line in the source file.
    pub line: u64,
    pub reason: String,
}

/// Outcome of a completed import.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Stored records, with their assigned ids, in file order.
    pub inserted: Vec<Record>,
    pub rejected: Vec<RejectedRow>,
}

#[derive(Debug)]
pub enum ImportError {
    /// Header lacks `NOMBRE` or `TELEFONO`; nothing was imported.
    Format { found: Vec<String> },
    Csv(csv::Error),
    Io(std::io::Error),
    /// Storage failed mid-import; rows before the failure stay stored.
    Agenda(AgendaError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Format { found } => write!(
                f,
                "CSV headers must be {IMPORT_NAME_COLUMN},{IMPORT_NUMBER_COLUMN}; found `{}`",
                found.join(",")
            ),
            Self::Csv(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Agenda(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Format { .. } => None,
            Self::Csv(err) => err.source(),
            Self::Io(err) => err.source(),
            Self::Agenda(err) => err.source(),
        }
    }
}

impl From<csv::Error> for ImportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<std::io::Error> for ImportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

#[derive(Debug)]
pub enum ExportError {
    Csv(csv::Error),
    Io(std::io::Error),
    Agenda(AgendaError),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Agenda(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Csv(err) => err.source(),
            Self::Io(err) => err.source(),
            Self::Agenda(err) => err.source(),
        }
    }
}

impl From<csv::Error> for ExportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Imports contacts from CSV data.
///
/// The whole input is parsed before the first insert, so header and
/// syntax problems leave storage untouched.
pub fn import_csv<R, D>(reader: D, service: &AgendaService<R>) -> Result<ImportReport, ImportError>
where
    R: RecordRepository,
    D: Read,
{
    let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    check_import_headers(&headers)?;

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let raw = result?;
        let line = raw.position().map_or(0, |pos| pos.line());
        let row: ImportRow = raw.deserialize(Some(&headers))?;
        rows.push((line, row));
    }

    let mut report = ImportReport::default();
    for (line, row) in rows {
        match service.add_contact(&row.name, &row.number) {
            Ok(record) => report.inserted.push(record),
            Err(AgendaError::Validation(err)) => report.rejected.push(RejectedRow {
                line,
                reason: err.to_string(),
            }),
            Err(other) => {
                warn!(
                    "event=csv_import module=transfer status=error line={} inserted={} error={}",
                    line,
                    report.inserted.len(),
                    other
                );
                return Err(ImportError::Agenda(other));
            }
        }
    }

    info!(
        "event=csv_import module=transfer status=ok inserted={} rejected={}",
        report.inserted.len(),
        report.rejected.len()
    );
    Ok(report)
}

/// Imports contacts from a CSV file on disk.
pub fn import_csv_file<R: RecordRepository>(
    path: impl AsRef<Path>,
    service: &AgendaService<R>,
) -> Result<ImportReport, ImportError> {
    let file = File::open(path)?;
    import_csv(file, service)
}

/// Writes `records` as CSV with an `id,name,number` header.
///
/// Returns the number of data rows written.
pub fn export_csv<W: Write>(writer: W, records: &[Record]) -> Result<usize, ExportError> {
    let mut csv_writer = WriterBuilder::new().has_headers(false).from_writer(writer);
    csv_writer.write_record(EXPORT_HEADER)?;
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(records.len())
}

/// Exports every stored contact to `path`, replacing any previous content.
pub fn export_csv_file<R: RecordRepository>(
    path: impl AsRef<Path>,
    service: &AgendaService<R>,
) -> Result<usize, ExportError> {
    let records = service.list_contacts().map_err(ExportError::Agenda)?;
    let file = File::create(path)?;
    let written = export_csv(file, &records)?;
    info!("event=csv_export module=transfer status=ok rows={written}");
    Ok(written)
}

fn check_import_headers(headers: &StringRecord) -> Result<(), ImportError> {
    let has = |column: &str| headers.iter().any(|header| header == column);
    if has(IMPORT_NAME_COLUMN) && has(IMPORT_NUMBER_COLUMN) {
        return Ok(());
    }

    warn!(
        "event=csv_import module=transfer status=error error_code=header_mismatch columns={}",
        headers.len()
    );
    Err(ImportError::Format {
        found: headers.iter().map(str::to_string).collect(),
    })
}
