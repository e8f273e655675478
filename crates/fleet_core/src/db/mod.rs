//! SQLite connection bootstrap for the fleet table.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Create the `fleet` table from the schema registry when absent.
//! - Reject existing files whose `fleet` table lacks registered columns.
//!
//! # Invariants
//! - Table creation is idempotent (`CREATE TABLE IF NOT EXISTS`).
//! - No schema migration is attempted; an incompatible table is an error.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    IncompatibleTable { missing_columns: Vec<String> },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::IncompatibleTable { missing_columns } => write!(
                f,
                "existing fleet table is missing columns: {}",
                missing_columns.join(", ")
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::IncompatibleTable { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
