//! Fleet record store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Translate get/insert/update/delete/select-all/filter into parameterized
//!   SQL against the single `fleet` table.
//! - Own the SQLite connection for the lifetime of the store.
//! - Report every operation, success or failure, to the audit port.
//!
//! # Invariants
//! - All statement text comes from `crate::schema`; column order never
//!   diverges between statements.
//! - Each mutation runs in its own transaction and is rolled back on failure.
//! - Column names from callers are checked against the registry before being
//!   spliced into SQL.
//! - `update_vehicle` does not check that the key exists; updating an absent
//!   key changes nothing and still succeeds.

use crate::audit::AuditSink;
use crate::config::TABLE_NAME;
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::vehicle::{FieldValue, Vehicle, VehicleId, VehicleValidationError};
use crate::schema::{self, FieldDescriptor, FieldKind};
use log::{debug, info, warn};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, ErrorCode, OptionalExtension, Row, Transaction};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Instant;

pub type RepoResult<T> = Result<T, RepoError>;

/// Store error returned by every fleet operation.
#[derive(Debug)]
pub enum RepoError {
    /// The database could not be opened or bootstrapped.
    StoreUnavailable(DbError),
    /// A constraint rejected the statement, e.g. a duplicate `v_num`.
    ConstraintViolation(rusqlite::Error),
    /// Any other statement-level SQLite failure.
    Statement(rusqlite::Error),
    Validation(VehicleValidationError),
    UnknownColumn(String),
    EmptyFilter,
    NotFound(VehicleId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StoreUnavailable(err) => write!(f, "fleet store unavailable: {err}"),
            Self::ConstraintViolation(err) => write!(f, "{err}"),
            Self::Statement(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::UnknownColumn(column) => write!(f, "unknown fleet column `{column}`"),
            Self::EmptyFilter => write!(f, "a filter needs at least one criterion"),
            Self::NotFound(id) => write!(f, "vehicle #{id} not found"),
            Self::InvalidData(message) => write!(f, "invalid persisted fleet data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StoreUnavailable(err) => Some(err),
            Self::ConstraintViolation(err) | Self::Statement(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::UnknownColumn(_) | Self::EmptyFilter | Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        match value.sqlite_error_code() {
            Some(ErrorCode::ConstraintViolation) => Self::ConstraintViolation(value),
            _ => Self::Statement(value),
        }
    }
}

impl From<VehicleValidationError> for RepoError {
    fn from(value: VehicleValidationError) -> Self {
        Self::Validation(value)
    }
}

/// How one filter criterion compares its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// `column = ?`
    Exact,
    /// `column LIKE ?`, where `%` matches any run of characters.
    Wildcard,
}

/// One `(column, mode, value)` filter triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriterion {
    pub column: String,
    pub mode: MatchMode,
    pub value: String,
}

impl FilterCriterion {
    pub fn exact(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            mode: MatchMode::Exact,
            value: value.into(),
        }
    }

    pub fn wildcard(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            mode: MatchMode::Wildcard,
            value: value.into(),
        }
    }
}

/// Repository interface for fleet record operations.
pub trait FleetRepository {
    /// Returns the vehicle keyed by `id`, or `None` when absent.
    fn get_vehicle(&self, id: VehicleId) -> RepoResult<Option<Vehicle>>;
    /// Inserts a new row; a duplicate key fails with `ConstraintViolation`.
    fn insert_vehicle(&mut self, vehicle: &Vehicle) -> RepoResult<VehicleId>;
    /// Overwrites every attribute of the row keyed by `vehicle.v_num`.
    fn update_vehicle(&mut self, vehicle: &Vehicle) -> RepoResult<()>;
    /// Deletes the row keyed by `id`. Returns `false` when nothing existed.
    fn delete_vehicle(&mut self, id: VehicleId) -> RepoResult<bool>;
    /// Returns every row in engine order.
    fn list_vehicles(&self) -> RepoResult<Vec<Vehicle>>;
    /// Returns rows matching all criteria (logical AND).
    fn filter_vehicles(&self, criteria: &[FilterCriterion]) -> RepoResult<Vec<Vehicle>>;
    /// Returns a single column of the row keyed by `id`.
    fn vehicle_value(&self, column: &str, id: VehicleId) -> RepoResult<Option<FieldValue>>;
    /// Returns the largest stored key, `None` for an empty table.
    fn max_vehicle_id(&self) -> RepoResult<Option<VehicleId>>;
}

/// SQLite-backed fleet store.
pub struct SqliteFleetStore {
    conn: Connection,
    audit: Box<dyn AuditSink>,
}

impl SqliteFleetStore {
    /// Opens or creates the database file at `path` and bootstraps the table.
    ///
    /// # Errors
    /// - `StoreUnavailable` when the file cannot be opened or the table
    ///   statement fails. The failure is also sent to `audit`.
    pub fn open(path: impl AsRef<Path>, audit: impl AuditSink + 'static) -> RepoResult<Self> {
        let path = path.as_ref();
        let conn = open_db(path);
        Self::from_open_result(conn, path.display().to_string(), Box::new(audit))
    }

    /// Opens a private in-memory database; used by tests and previews.
    pub fn open_in_memory(audit: impl AuditSink + 'static) -> RepoResult<Self> {
        Self::from_open_result(open_db_in_memory(), ":memory:".to_string(), Box::new(audit))
    }

    fn from_open_result(
        conn: Result<Connection, DbError>,
        target: String,
        audit: Box<dyn AuditSink>,
    ) -> RepoResult<Self> {
        match conn {
            Ok(conn) => {
                audit.record(&format!("Connected to {target}"));
                Ok(Self { conn, audit })
            }
            Err(err) => {
                audit.record(&format!("Could not open {target}: {err}"));
                Err(RepoError::StoreUnavailable(err))
            }
        }
    }

    fn write<T>(
        &mut self,
        op: impl FnOnce(&Transaction<'_>) -> rusqlite::Result<T>,
    ) -> RepoResult<T> {
        let tx = self.conn.transaction()?;
        // Dropping `tx` on the error path rolls the statement back.
        let out = op(&tx)?;
        tx.commit()?;
        Ok(out)
    }

    fn find_vehicle(&self, id: VehicleId) -> RepoResult<Option<Vehicle>> {
        let sql = format!(
            "{} WHERE {} = ?1;",
            schema::select_all_sql(),
            schema::primary_key().column
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_vehicle_row(row)?)),
            None => Ok(None),
        }
    }

    fn vehicle_exists(&self, id: VehicleId) -> RepoResult<bool> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {TABLE_NAME} WHERE {} = ?1);",
            schema::primary_key().column
        );
        let exists: i64 = self.conn.query_row(&sql, [id], |row| row.get(0))?;
        Ok(exists == 1)
    }

    fn query_vehicles(&self, sql: &str, binds: Vec<Value>) -> RepoResult<Vec<Vehicle>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut vehicles = Vec::new();
        while let Some(row) = rows.next()? {
            vehicles.push(parse_vehicle_row(row)?);
        }
        Ok(vehicles)
    }

    fn run_filter(&self, criteria: &[FilterCriterion]) -> RepoResult<Vec<Vehicle>> {
        if criteria.is_empty() {
            return Err(RepoError::EmptyFilter);
        }

        let mut clauses = Vec::with_capacity(criteria.len());
        let mut binds = Vec::with_capacity(criteria.len());
        for criterion in criteria {
            let field = schema::descriptor(&criterion.column)
                .ok_or_else(|| RepoError::UnknownColumn(criterion.column.clone()))?;
            clauses.push(match criterion.mode {
                MatchMode::Exact => format!("{} = ?", field.column),
                MatchMode::Wildcard => format!("{} LIKE ?", field.column),
            });
            binds.push(Value::Text(criterion.value.clone()));
        }

        let sql = format!(
            "{} WHERE {};",
            schema::select_all_sql(),
            clauses.join(" AND ")
        );
        self.query_vehicles(&sql, binds)
    }
}

impl FleetRepository for SqliteFleetStore {
    fn get_vehicle(&self, id: VehicleId) -> RepoResult<Option<Vehicle>> {
        match self.find_vehicle(id) {
            Ok(found) => {
                debug!(
                    "event=fleet_get module=repo status=ok v_num={id} found={}",
                    found.is_some()
                );
                self.audit.record(&match found {
                    Some(_) => format!("Loaded Vehicle #{id}."),
                    None => format!("Vehicle #{id} not found."),
                });
                Ok(found)
            }
            Err(err) => {
                warn!("event=fleet_get module=repo status=error v_num={id} error={err}");
                self.audit
                    .record(&format!("Error loading Vehicle #{id}: {err}"));
                Err(err)
            }
        }
    }

    fn insert_vehicle(&mut self, vehicle: &Vehicle) -> RepoResult<VehicleId> {
        let started_at = Instant::now();
        let binds = to_sql_values(vehicle.values());
        let result = self.write(|tx| tx.execute(schema::insert_sql(), params_from_iter(binds)));

        match result {
            Ok(_) => {
                info!(
                    "event=fleet_insert module=repo status=ok v_num={} duration_ms={}",
                    vehicle.v_num,
                    started_at.elapsed().as_millis()
                );
                self.audit
                    .record(&format!("Vehicle #{} added to database.", vehicle.v_num));
                Ok(vehicle.v_num)
            }
            Err(err) => {
                warn!(
                    "event=fleet_insert module=repo status=error v_num={} error={}",
                    vehicle.v_num, err
                );
                self.audit.record(&format!("Error in adding record: {err}"));
                Err(err)
            }
        }
    }

    fn update_vehicle(&mut self, vehicle: &Vehicle) -> RepoResult<()> {
        let started_at = Instant::now();
        let binds = to_sql_values(vehicle.update_values());
        let result = self.write(|tx| tx.execute(schema::update_sql(), params_from_iter(binds)));

        match result {
            Ok(changed) => {
                info!(
                    "event=fleet_update module=repo status=ok v_num={} rows={} duration_ms={}",
                    vehicle.v_num,
                    changed,
                    started_at.elapsed().as_millis()
                );
                self.audit
                    .record(&format!("Vehicle #{} updated.", vehicle.v_num));
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=fleet_update module=repo status=error v_num={} error={}",
                    vehicle.v_num, err
                );
                self.audit.record(&format!(
                    "Error updating Vehicle #{} record: {err}",
                    vehicle.v_num
                ));
                Err(err)
            }
        }
    }

    fn delete_vehicle(&mut self, id: VehicleId) -> RepoResult<bool> {
        match self.vehicle_exists(id) {
            Ok(true) => {}
            Ok(false) => {
                debug!("event=fleet_delete module=repo status=skipped v_num={id} reason=absent");
                self.audit
                    .record(&format!("Vehicle #{id} not found; nothing deleted."));
                return Ok(false);
            }
            Err(err) => {
                warn!("event=fleet_delete module=repo status=error v_num={id} error={err}");
                self.audit.record(&format!("Error deleting records: {err}"));
                return Err(err);
            }
        }

        let sql = format!(
            "DELETE FROM {TABLE_NAME} WHERE {} = ?1;",
            schema::primary_key().column
        );
        let result = self.write(|tx| tx.execute(&sql, [id]));

        match result {
            Ok(_) => {
                info!("event=fleet_delete module=repo status=ok v_num={id}");
                self.audit.record(&format!("Deleted Vehicle #{id}."));
                Ok(true)
            }
            Err(err) => {
                warn!("event=fleet_delete module=repo status=error v_num={id} error={err}");
                self.audit.record(&format!("Error deleting records: {err}"));
                Err(err)
            }
        }
    }

    fn list_vehicles(&self) -> RepoResult<Vec<Vehicle>> {
        match self.query_vehicles(schema::select_all_sql(), Vec::new()) {
            Ok(vehicles) => {
                debug!(
                    "event=fleet_list module=repo status=ok rows={}",
                    vehicles.len()
                );
                self.audit.record(&match vehicles.len() {
                    1 => "Loaded 1 record.".to_string(),
                    count => format!("Loaded {count} records."),
                });
                Ok(vehicles)
            }
            Err(err) => {
                warn!("event=fleet_list module=repo status=error error={err}");
                self.audit.record(&format!("Error loading records: {err}"));
                Err(err)
            }
        }
    }

    fn filter_vehicles(&self, criteria: &[FilterCriterion]) -> RepoResult<Vec<Vehicle>> {
        match self.run_filter(criteria) {
            Ok(vehicles) => {
                info!(
                    "event=fleet_filter module=repo status=ok criteria={} rows={}",
                    criteria.len(),
                    vehicles.len()
                );
                self.audit.record(&match vehicles.len() {
                    1 => "The query returned 1 record.".to_string(),
                    count => format!("The query returned {count} records."),
                });
                Ok(vehicles)
            }
            Err(err) => {
                warn!("event=fleet_filter module=repo status=error error={err}");
                self.audit.record(&format!("Search error: {err}"));
                Err(err)
            }
        }
    }

    fn vehicle_value(&self, column: &str, id: VehicleId) -> RepoResult<Option<FieldValue>> {
        match self.read_value(column, id) {
            Ok(value) => {
                self.audit.record(&match &value {
                    Some(_) => format!("Read {column} of Vehicle #{id}."),
                    None => format!("Vehicle #{id} not found."),
                });
                Ok(value)
            }
            Err(err) => {
                warn!("event=fleet_value module=repo status=error v_num={id} error={err}");
                self.audit
                    .record(&format!("Error reading {column} of Vehicle #{id}: {err}"));
                Err(err)
            }
        }
    }

    fn max_vehicle_id(&self) -> RepoResult<Option<VehicleId>> {
        let sql = format!(
            "SELECT MAX({}) FROM {TABLE_NAME};",
            schema::primary_key().column
        );
        match self
            .conn
            .query_row(&sql, [], |row| row.get::<_, Option<VehicleId>>(0))
        {
            Ok(max) => {
                self.audit.record(&match max {
                    Some(max) => format!("Highest Vehicle # is {max}."),
                    None => "No vehicles recorded yet.".to_string(),
                });
                Ok(max)
            }
            Err(err) => {
                let err = RepoError::from(err);
                warn!("event=fleet_max_id module=repo status=error error={err}");
                self.audit
                    .record(&format!("Error reading vehicle numbers: {err}"));
                Err(err)
            }
        }
    }
}

impl SqliteFleetStore {
    fn read_value(&self, column: &str, id: VehicleId) -> RepoResult<Option<FieldValue>> {
        let field =
            schema::descriptor(column).ok_or_else(|| RepoError::UnknownColumn(column.to_string()))?;
        let sql = format!(
            "SELECT {} FROM {TABLE_NAME} WHERE {} = ?1;",
            field.column,
            schema::primary_key().column
        );
        let value = self
            .conn
            .query_row(&sql, [id], |row| row.get::<_, Value>(0))
            .optional()?;
        value.map(|value| from_sql_value(field, value)).transpose()
    }
}

fn parse_vehicle_row(row: &Row<'_>) -> RepoResult<Vehicle> {
    let mut vehicle = Vehicle::default();
    for (index, field) in schema::fields().iter().enumerate() {
        let value = from_sql_value(field, row.get::<_, Value>(index)?)?;
        vehicle
            .set_value(field.column, value)
            .map_err(|err| RepoError::InvalidData(format!("{err} in fleet.{}", field.column)))?;
    }
    Ok(vehicle)
}

/// Converts a stored value to the field's kind.
///
/// Files written by the desktop front end bind every value as text, so
/// integer columns may hold numeric text or `''` for a blank entry.
fn from_sql_value(field: &FieldDescriptor, value: Value) -> RepoResult<FieldValue> {
    let column = field.column;
    match (field.kind, value) {
        (_, Value::Null) => Ok(FieldValue::Null),
        (FieldKind::Integer, Value::Integer(value)) => Ok(FieldValue::Integer(value)),
        (FieldKind::Integer, Value::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(FieldValue::Null);
            }
            trimmed.parse::<i64>().map(FieldValue::Integer).map_err(|_| {
                RepoError::InvalidData(format!("non-numeric value `{text}` in fleet.{column}"))
            })
        }
        (FieldKind::Text, Value::Text(text)) => Ok(FieldValue::Text(text)),
        (FieldKind::Text, Value::Integer(value)) => Ok(FieldValue::Text(value.to_string())),
        (FieldKind::Text, Value::Real(value)) => Ok(FieldValue::Text(value.to_string())),
        (FieldKind::Integer, Value::Real(value)) => Err(RepoError::InvalidData(format!(
            "unexpected real value `{value}` in fleet.{column}"
        ))),
        (_, Value::Blob(_)) => Err(RepoError::InvalidData(format!(
            "unexpected blob value in fleet.{column}"
        ))),
    }
}

fn to_sql_values(values: Vec<FieldValue>) -> Vec<Value> {
    values
        .into_iter()
        .map(|value| match value {
            FieldValue::Null => Value::Null,
            FieldValue::Integer(value) => Value::Integer(value),
            FieldValue::Text(value) => Value::Text(value),
        })
        .collect()
}
