//! Record store abstractions and persistence implementation.
//!
//! # Responsibility
//! - Define the fleet data-access contract.
//! - Isolate SQLite statement details from service/presentation code.
//!
//! # Invariants
//! - Store APIs return error values; nothing panics on statement failure.
//! - No retries: every call is a single attempt.

pub mod fleet_repo;
