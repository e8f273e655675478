//! Static field registry for the `fleet` table and the SQL derived from it.
//!
//! # Responsibility
//! - Own the ordered descriptor list.
//! - Derive every column list and statement text from that order.
//!
//! # Invariants
//! - `FIELDS[0]` is the integer primary key `v_num`.
//! - Column order is identical across CREATE, INSERT, UPDATE and SELECT.
//! - Reordering or renaming entries breaks existing database files.

use super::field::{FieldDescriptor, FieldKind, QueryMode};
use crate::config::TABLE_NAME;
use once_cell::sync::Lazy;
use std::collections::HashMap;

const DEPARTMENTS: &[&str] = &[
    "",
    "Executive",
    "Parks",
    "Utilities",
    "Finance",
    "Building & Safety",
    "Environmental",
    "UAP Task Force",
];

const VEHICLE_CLASSES: &[&str] = &[
    "",
    "Compact",
    "Full-size",
    "Van",
    "Light truck",
    "Heavy duty truck",
    "Bird",
];

const MOTOR_TYPES: &[&str] = &["Gas", "Diesel", "CNG", "Hybrid", "Electric"];

const YES_NO: &[&str] = &["Yes", "No"];

const fn text(
    column: &'static str,
    label: &'static str,
    display_width: u16,
) -> FieldDescriptor {
    FieldDescriptor {
        column,
        kind: FieldKind::Text,
        label,
        query_mode: QueryMode::ExactString,
        allowed_values: &[],
        display_width,
    }
}

const fn choice(
    column: &'static str,
    label: &'static str,
    query_mode: QueryMode,
    allowed_values: &'static [&'static str],
    display_width: u16,
) -> FieldDescriptor {
    FieldDescriptor {
        column,
        kind: FieldKind::Text,
        label,
        query_mode,
        allowed_values,
        display_width,
    }
}

static FIELDS: [FieldDescriptor; 11] = [
    FieldDescriptor {
        column: "v_num",
        kind: FieldKind::Integer,
        label: "Vehicle #",
        query_mode: QueryMode::ExactString,
        allowed_values: &[],
        display_width: 75,
    },
    text("vin", "VIN", 150),
    choice("dept", "Department", QueryMode::Dropdown, DEPARTMENTS, 100),
    FieldDescriptor {
        column: "year",
        kind: FieldKind::Integer,
        label: "Year",
        query_mode: QueryMode::ExactString,
        allowed_values: &[],
        display_width: 35,
    },
    text("make", "Make", 100),
    text("model", "Model", 100),
    choice("class", "Vehicle Class", QueryMode::Dropdown, VEHICLE_CLASSES, 100),
    text("lic", "License Plate", 100),
    choice("motor", "Motor Type", QueryMode::Radio, MOTOR_TYPES, 80),
    choice("retired", "Retired?", QueryMode::Radio, YES_NO, 60),
    text("notes", "Notes", 200),
];

static BY_COLUMN: Lazy<HashMap<&'static str, &'static FieldDescriptor>> =
    Lazy::new(|| FIELDS.iter().map(|field| (field.column, field)).collect());

static CREATE_TABLE_SQL: Lazy<String> = Lazy::new(|| {
    let key = primary_key();
    let mut columns = vec![format!("{} INTEGER PRIMARY KEY", key.column)];
    columns.extend(
        attribute_fields()
            .iter()
            .map(|field| format!("{} {}", field.column, field.kind.sql_type())),
    );
    format!(
        "CREATE TABLE IF NOT EXISTS {TABLE_NAME} ({});",
        columns.join(", ")
    )
});

static INSERT_SQL: Lazy<String> = Lazy::new(|| {
    let placeholders = vec!["?"; FIELDS.len()].join(", ");
    format!(
        "INSERT INTO {TABLE_NAME} ({}) VALUES ({placeholders});",
        column_names().join(", ")
    )
});

static UPDATE_SQL: Lazy<String> = Lazy::new(|| {
    let assignments = attribute_fields()
        .iter()
        .map(|field| format!("{} = ?", field.column))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {TABLE_NAME} SET {assignments} WHERE {} = ?;",
        primary_key().column
    )
});

static SELECT_ALL_SQL: Lazy<String> =
    Lazy::new(|| format!("SELECT {} FROM {TABLE_NAME}", column_names().join(", ")));

/// Returns every descriptor in column order, primary key first.
pub fn fields() -> &'static [FieldDescriptor] {
    &FIELDS
}

/// Returns the primary key descriptor (`v_num`).
pub fn primary_key() -> &'static FieldDescriptor {
    &FIELDS[0]
}

/// Returns the non-key descriptors in column order.
pub fn attribute_fields() -> &'static [FieldDescriptor] {
    &FIELDS[1..]
}

/// Looks up a descriptor by column name.
pub fn descriptor(column: &str) -> Option<&'static FieldDescriptor> {
    BY_COLUMN.get(column).copied()
}

/// Column names in schema order, primary key first.
pub fn column_names() -> Vec<&'static str> {
    FIELDS.iter().map(|field| field.column).collect()
}

/// Idempotent table bootstrap statement.
pub fn create_table_sql() -> &'static str {
    CREATE_TABLE_SQL.as_str()
}

/// Insert statement binding every column in schema order.
pub fn insert_sql() -> &'static str {
    INSERT_SQL.as_str()
}

/// Update statement binding attributes in schema order, key last.
pub fn update_sql() -> &'static str {
    UPDATE_SQL.as_str()
}

/// Select statement listing every column in schema order, without a
/// trailing `WHERE` or `;` so callers can append clauses.
pub fn select_all_sql() -> &'static str {
    SELECT_ALL_SQL.as_str()
}
