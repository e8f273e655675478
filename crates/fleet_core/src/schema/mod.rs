//! Schema registry for the `fleet` table.
//!
//! # Responsibility
//! - Expose the ordered, immutable field descriptor list.
//! - Derive column lists and statement text shared by the store and UI code.
//!
//! # Invariants
//! - The first descriptor is always the primary key.
//! - Nothing mutates the registry at runtime.

mod field;
mod registry;

pub use field::{FieldDescriptor, FieldKind, QueryMode};
pub use registry::{
    attribute_fields, column_names, create_table_sql, descriptor, fields, insert_sql,
    primary_key, select_all_sql, update_sql,
};
