//! Fixed configuration values.
//!
//! The store takes no flags or environment variables; these literals are the
//! whole configuration surface.

/// Database file opened by the default entry points, relative to the
/// working directory.
pub const DEFAULT_DB_FILE_NAME: &str = "fleet.db";

/// The single table managed by the store.
pub const TABLE_NAME: &str = "fleet";

pub(crate) const LOG_FILE_BASENAME: &str = "fleet";
pub(crate) const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
pub(crate) const MAX_LOG_FILES: usize = 5;
