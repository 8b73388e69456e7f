//! Agenda table bootstrap.
//!
//! # Responsibility
//! - Create the single `agenda` table if it does not exist yet.
//! - Give a pre-existing table without an `id` column an explicit
//!   `AUTOINCREMENT` key, keeping each row's old rowid as its id.
//! - Stamp and check the schema version in `PRAGMA user_version`.
//!
//! # Invariants
//! - Bootstrap is idempotent: opening an initialized database is a no-op.
//! - A database stamped with a newer version is never touched.
//! - Ids are never reused, even after the newest row is deleted.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

const AGENDA_TABLE_SQL: &str = include_str!("agenda.sql");
const ADOPT_ROWID_SQL: &str = include_str!("adopt_rowid.sql");

/// Schema version written by this binary.
pub const SCHEMA_VERSION: u32 = 1;

/// Table holding contact rows.
pub const AGENDA_TABLE: &str = "agenda";

/// Creates the agenda table when absent and stamps the schema version.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;

    if current_version > SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: SCHEMA_VERSION,
        });
    }

    if current_version == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    tx.execute_batch(AGENDA_TABLE_SQL)?;
    let adopted = !has_id_column(&tx)?;
    if adopted {
        tx.execute_batch(ADOPT_ROWID_SQL)?;
    }
    tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    tx.commit()?;

    info!(
        "event=schema_init module=db status=ok from_version={} to_version={} adopted_rowid={}",
        current_version, SCHEMA_VERSION, adopted
    );
    Ok(())
}

/// Reads the schema version stamped on the connection.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

fn has_id_column(conn: &Connection) -> DbResult<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM pragma_table_info(?1) WHERE name = 'id');",
        [AGENDA_TABLE],
        |row| row.get(0),
    )?;
    Ok(exists)
}
