//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Run the idempotent table bootstrap before handing out a connection.
//!
//! # Invariants
//! - Returned connections have a `fleet` table with every registered column.

use super::{DbError, DbResult};
use crate::config::TABLE_NAME;
use crate::schema;
use log::{error, info};
use rusqlite::Connection;
use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

/// Opens (or creates) a SQLite database file and ensures the `fleet` table.
///
/// # Side effects
/// - Creates the file when it does not exist.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!(
        "event=db_open module=db status=start mode=file path={}",
        path.display()
    );
    finish_open(Connection::open(path), "file", started_at)
}

/// Opens an in-memory SQLite database and ensures the `fleet` table.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");
    finish_open(Connection::open_in_memory(), "memory", started_at)
}

fn finish_open(
    opened: rusqlite::Result<Connection>,
    mode: &str,
    started_at: Instant,
) -> DbResult<Connection> {
    let conn = match opened {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_bootstrap_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(schema::create_table_sql())?;
    ensure_registered_columns(conn)
}

fn ensure_registered_columns(conn: &Connection) -> DbResult<()> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({TABLE_NAME});"))?;
    let present = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<rusqlite::Result<HashSet<_>>>()?;

    let missing_columns: Vec<String> = schema::column_names()
        .into_iter()
        .filter(|column| !present.contains(*column))
        .map(str::to_string)
        .collect();

    if missing_columns.is_empty() {
        Ok(())
    } else {
        Err(DbError::IncompatibleTable { missing_columns })
    }
}
