//! Core record store for the municipal fleet manager.
//! This crate owns the field schema and every access to the fleet database.

pub mod audit;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schema;
pub mod service;

pub use audit::{AuditSink, LogAuditSink, NoopAuditSink};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::vehicle::{FieldValue, Vehicle, VehicleId, VehicleValidationError};
pub use repo::fleet_repo::{
    FilterCriterion, FleetRepository, MatchMode, RepoError, RepoResult, SqliteFleetStore,
};
pub use schema::{FieldDescriptor, FieldKind, QueryMode};
pub use service::fleet_service::{build_filter_criteria, FleetService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
