//! Domain model for fleet records.
//!
//! # Responsibility
//! - Define the typed vehicle row and its column value type.
//! - Keep input validation next to the data it guards.
//!
//! # Invariants
//! - Every vehicle is identified by a caller- or service-assigned `v_num`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod vehicle;
