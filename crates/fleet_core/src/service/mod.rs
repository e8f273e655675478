//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into the workflows the presentation layer needs.
//! - Keep UI code decoupled from SQL and schema details.

pub mod fleet_service;
