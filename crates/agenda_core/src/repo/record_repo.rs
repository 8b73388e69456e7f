//! Record repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/list/update/delete over the `agenda` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every statement binds its values; record text never reaches SQL source.
//! - Update/delete report a missing row as `WriteOutcome::NotFound`, never as
//!   success and never as an error.
//! - Execution faults are logged here and returned as `Err`.
//! - Field rules are not enforced here; callers validate first.

use crate::db::schema::{current_user_version, AGENDA_TABLE, SCHEMA_VERSION};
use crate::db::DbError;
use crate::model::record::{Record, RecordId};
use log::{debug, error};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const RECORD_SELECT_SQL: &str = "SELECT id, name, number FROM agenda";
const REQUIRED_COLUMNS: &[&str] = &["id", "name", "number"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage-level failure for record operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it through db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
        }
    }
}

// `Db` is transparent: it displays the inner error and forwards its cause.
impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => err.source(),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Result of an update or delete that executed without fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// One row matched the id and was changed.
    Applied,
    /// No row carries this id; nothing changed.
    NotFound(RecordId),
}

impl WriteOutcome {
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }

    fn from_changed(changed: usize, id: RecordId) -> Self {
        if changed == 0 {
            Self::NotFound(id)
        } else {
            Self::Applied
        }
    }
}

/// Repository interface for record CRUD operations.
pub trait RecordRepository {
    /// Stores name and number, returning a new id (>= 1) never used before.
    fn insert(&self, record: &Record) -> RepoResult<RecordId>;
    /// Reads every stored record ordered by id.
    fn get_all(&self) -> RepoResult<Vec<Record>>;
    /// Overwrites name and number of the row addressed by `record.id`.
    fn update(&self, record: &Record) -> RepoResult<WriteOutcome>;
    /// Removes the row addressed by `record.id`.
    fn delete(&self, record: &Record) -> RepoResult<WriteOutcome>;
}

impl<R: RecordRepository + ?Sized> RecordRepository for &R {
    fn insert(&self, record: &Record) -> RepoResult<RecordId> {
        (**self).insert(record)
    }

    fn get_all(&self) -> RepoResult<Vec<Record>> {
        (**self).get_all()
    }

    fn update(&self, record: &Record) -> RepoResult<WriteOutcome> {
        (**self).update(record)
    }

    fn delete(&self, record: &Record) -> RepoResult<WriteOutcome> {
        (**self).delete(record)
    }
}

/// SQLite-backed record repository.
pub struct SqliteRecordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordRepository<'conn> {
    /// Wraps a connection returned by `db::open_db` / `db::open_db_in_memory`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version was never stamped.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the stamped
    ///   schema does not actually hold the agenda table.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let actual_version = current_user_version(conn)?;
        if actual_version != SCHEMA_VERSION {
            return Err(RepoError::UninitializedConnection {
                expected_version: SCHEMA_VERSION,
                actual_version,
            });
        }

        let columns = table_columns(conn, AGENDA_TABLE)?;
        if columns.is_empty() {
            return Err(RepoError::MissingRequiredTable(AGENDA_TABLE));
        }
        for &column in REQUIRED_COLUMNS {
            if !columns.iter().any(|name| name == column) {
                return Err(RepoError::MissingRequiredColumn {
                    table: AGENDA_TABLE,
                    column,
                });
            }
        }

        Ok(Self { conn })
    }
}

impl RecordRepository for SqliteRecordRepository<'_> {
    fn insert(&self, record: &Record) -> RepoResult<RecordId> {
        logged("record_insert", || {
            let id: RecordId = self.conn.query_row(
                "INSERT INTO agenda (name, number) VALUES (?1, ?2) RETURNING id;",
                params![record.name.as_str(), record.number.as_str()],
                |row| row.get(0),
            )?;
            debug!("event=record_insert module=repo status=ok id={id}");
            Ok(id)
        })
    }

    fn get_all(&self) -> RepoResult<Vec<Record>> {
        logged("record_list", || {
            let mut stmt = self
                .conn
                .prepare(&format!("{RECORD_SELECT_SQL} ORDER BY id ASC;"))?;
            let mut rows = stmt.query([])?;
            let mut records = Vec::new();

            while let Some(row) = rows.next()? {
                records.push(parse_record_row(row)?);
            }

            debug!(
                "event=record_list module=repo status=ok count={}",
                records.len()
            );
            Ok(records)
        })
    }

    fn update(&self, record: &Record) -> RepoResult<WriteOutcome> {
        logged("record_update", || {
            let changed = self.conn.execute(
                "UPDATE agenda SET name = ?1, number = ?2 WHERE id = ?3;",
                params![record.name.as_str(), record.number.as_str(), record.id],
            )?;
            let outcome = WriteOutcome::from_changed(changed, record.id);
            debug!(
                "event=record_update module=repo status=ok id={} applied={}",
                record.id,
                outcome.is_applied()
            );
            Ok(outcome)
        })
    }

    fn delete(&self, record: &Record) -> RepoResult<WriteOutcome> {
        logged("record_delete", || {
            let changed = self
                .conn
                .execute("DELETE FROM agenda WHERE id = ?1;", [record.id])?;
            let outcome = WriteOutcome::from_changed(changed, record.id);
            debug!(
                "event=record_delete module=repo status=ok id={} applied={}",
                record.id,
                outcome.is_applied()
            );
            Ok(outcome)
        })
    }
}

/// Runs one repository operation, logging execution faults before returning them.
fn logged<T>(event: &'static str, op: impl FnOnce() -> RepoResult<T>) -> RepoResult<T> {
    op().inspect_err(|err| {
        error!("event={event} module=repo status=error error={err}");
    })
}

fn parse_record_row(row: &Row<'_>) -> RepoResult<Record> {
    let id: RecordId = row.get("id")?;
    if id <= 0 {
        return Err(RepoError::InvalidData(format!(
            "invalid id `{id}` in agenda.id"
        )));
    }

    Ok(Record {
        id,
        name: row.get("name")?,
        number: row.get("number")?,
    })
}

fn table_columns(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([table], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}
