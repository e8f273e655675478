//! Vehicle record model.
//!
//! # Responsibility
//! - Define the typed shape of one `fleet` row.
//! - Map between the typed struct and schema-ordered column values.
//! - Validate user-entered values against the schema's choice sets.
//!
//! # Invariants
//! - `values()` follows `schema::fields()` order exactly.
//! - `v_num` and `vin` are fixed once a record is stored; only the caller
//!   enforces this.
//!
//! # See also
//! - `crate::schema` for column order and allowed values.

use crate::schema::{self, FieldKind};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static DIGITS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid digits regex"));

/// Primary key of a fleet row (`v_num`).
pub type VehicleId = i64;

/// One column value, typed per the field's storage kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Text(String),
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// Validation failure for vehicle input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VehicleValidationError {
    MissingVin,
    NonPositiveId(VehicleId),
    NegativeYear(i64),
    NotAllowed { column: &'static str, value: String },
    NotNumeric { column: &'static str, value: String },
    TypeMismatch { column: String, value: FieldValue },
    UnknownColumn(String),
    WrongFieldCount { expected: usize, actual: usize },
}

impl Display for VehicleValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingVin => write!(f, "VIN is required"),
            Self::NonPositiveId(id) => write!(f, "vehicle number must be positive, got {id}"),
            Self::NegativeYear(year) => write!(f, "year cannot be negative, got {year}"),
            Self::NotAllowed { column, value } => {
                write!(f, "`{value}` is not an allowed value for {column}")
            }
            Self::NotNumeric { column, value } => {
                write!(f, "{column} can only contain numbers, got `{value}`")
            }
            Self::TypeMismatch { column, value } => {
                write!(f, "value {value:?} does not fit column {column}")
            }
            Self::UnknownColumn(column) => write!(f, "unknown column `{column}`"),
            Self::WrongFieldCount { expected, actual } => {
                write!(f, "expected {expected} field values, got {actual}")
            }
        }
    }
}

impl Error for VehicleValidationError {}

/// One row of the `fleet` table.
///
/// Serde field names equal the column names so presentation code can key
/// rendered cells by `FieldDescriptor::column`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub v_num: VehicleId,
    pub vin: String,
    pub dept: String,
    /// `None` when the year was left blank.
    pub year: Option<i64>,
    pub make: String,
    pub model: String,
    pub class: String,
    pub lic: String,
    pub motor: String,
    pub retired: String,
    pub notes: String,
}

impl Vehicle {
    /// Creates a record with the two fields every vehicle needs; the rest
    /// start blank.
    pub fn new(v_num: VehicleId, vin: impl Into<String>) -> Self {
        Self {
            v_num,
            vin: vin.into(),
            ..Self::default()
        }
    }

    /// Builds a record from raw form strings given in schema order.
    ///
    /// Integer fields must be digits only; a blank `year` becomes `None`.
    /// Choice sets are not checked here, see [`Vehicle::validate`].
    pub fn from_form(inputs: &[&str]) -> Result<Self, VehicleValidationError> {
        let fields = schema::fields();
        if inputs.len() != fields.len() {
            return Err(VehicleValidationError::WrongFieldCount {
                expected: fields.len(),
                actual: inputs.len(),
            });
        }

        let mut vehicle = Self::default();
        for (field, raw) in fields.iter().zip(inputs) {
            let value = match field.kind {
                FieldKind::Integer => parse_integer_input(field.column, raw)?,
                FieldKind::Text => FieldValue::Text((*raw).to_string()),
            };
            vehicle.set_value(field.column, value)?;
        }
        Ok(vehicle)
    }

    /// Returns the value stored under `column`, or `None` for unknown columns.
    pub fn value(&self, column: &str) -> Option<FieldValue> {
        match column {
            "v_num" => Some(FieldValue::Integer(self.v_num)),
            "year" => Some(self.year.map_or(FieldValue::Null, FieldValue::Integer)),
            other => self
                .text_slot(other)
                .map(|text| FieldValue::Text(text.to_string())),
        }
    }

    /// All column values in schema order, primary key first.
    pub fn values(&self) -> Vec<FieldValue> {
        schema::fields()
            .iter()
            .map(|field| self.value(field.column).unwrap_or(FieldValue::Null))
            .collect()
    }

    /// Attribute values in schema order followed by the primary key, matching
    /// the placeholder order of `schema::update_sql()`.
    pub fn update_values(&self) -> Vec<FieldValue> {
        let mut values: Vec<FieldValue> = schema::attribute_fields()
            .iter()
            .map(|field| self.value(field.column).unwrap_or(FieldValue::Null))
            .collect();
        values.push(FieldValue::Integer(self.v_num));
        values
    }

    /// Stores `value` under `column`.
    ///
    /// `Null` clears text columns and `year`. The primary key never accepts
    /// `Null`.
    pub fn set_value(
        &mut self,
        column: &str,
        value: FieldValue,
    ) -> Result<(), VehicleValidationError> {
        match (column, value) {
            ("v_num", FieldValue::Integer(id)) => self.v_num = id,
            ("year", FieldValue::Integer(year)) => self.year = Some(year),
            ("year", FieldValue::Null) => self.year = None,
            (other, value) => {
                let slot = self
                    .text_slot_mut(other)
                    .ok_or_else(|| mismatch_or_unknown(other, &value))?;
                match value {
                    FieldValue::Text(text) => *slot = text,
                    FieldValue::Null => slot.clear(),
                    integer @ FieldValue::Integer(_) => {
                        return Err(VehicleValidationError::TypeMismatch {
                            column: other.to_string(),
                            value: integer,
                        })
                    }
                }
            }
        }
        Ok(())
    }

    /// Checks user-facing constraints before a record is written.
    ///
    /// # Errors
    /// - `MissingVin` when `vin` is blank.
    /// - `NonPositiveId` when `v_num <= 0`.
    /// - `NegativeYear` when `year < 0`.
    /// - `NotAllowed` when a dropdown/radio value is outside its choice set.
    pub fn validate(&self) -> Result<(), VehicleValidationError> {
        if self.v_num <= 0 {
            return Err(VehicleValidationError::NonPositiveId(self.v_num));
        }
        if self.vin.trim().is_empty() {
            return Err(VehicleValidationError::MissingVin);
        }
        if let Some(year) = self.year.filter(|year| *year < 0) {
            return Err(VehicleValidationError::NegativeYear(year));
        }

        for field in schema::attribute_fields() {
            if !field.query_mode.is_choice() {
                continue;
            }
            let value = self.text_slot(field.column).unwrap_or_default();
            if !field.accepts(value) {
                return Err(VehicleValidationError::NotAllowed {
                    column: field.column,
                    value: value.to_string(),
                });
            }
        }

        Ok(())
    }

    fn text_slot(&self, column: &str) -> Option<&str> {
        let slot = match column {
            "vin" => &self.vin,
            "dept" => &self.dept,
            "make" => &self.make,
            "model" => &self.model,
            "class" => &self.class,
            "lic" => &self.lic,
            "motor" => &self.motor,
            "retired" => &self.retired,
            "notes" => &self.notes,
            _ => return None,
        };
        Some(slot.as_str())
    }

    fn text_slot_mut(&mut self, column: &str) -> Option<&mut String> {
        match column {
            "vin" => Some(&mut self.vin),
            "dept" => Some(&mut self.dept),
            "make" => Some(&mut self.make),
            "model" => Some(&mut self.model),
            "class" => Some(&mut self.class),
            "lic" => Some(&mut self.lic),
            "motor" => Some(&mut self.motor),
            "retired" => Some(&mut self.retired),
            "notes" => Some(&mut self.notes),
            _ => None,
        }
    }
}

/// Returns whether a raw integer-field input is digits only, optionally with
/// `%` wildcards when `allow_wildcard` is set.
pub(crate) fn is_numeric_input(raw: &str, allow_wildcard: bool) -> bool {
    if allow_wildcard {
        let stripped = raw.replace('%', "");
        stripped.is_empty() || DIGITS_RE.is_match(&stripped)
    } else {
        DIGITS_RE.is_match(raw)
    }
}

fn parse_integer_input(
    column: &'static str,
    raw: &str,
) -> Result<FieldValue, VehicleValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() && column != schema::primary_key().column {
        return Ok(FieldValue::Null);
    }
    let not_numeric = || VehicleValidationError::NotNumeric {
        column,
        value: raw.to_string(),
    };
    if !is_numeric_input(trimmed, false) {
        return Err(not_numeric());
    }
    trimmed
        .parse::<i64>()
        .map(FieldValue::Integer)
        .map_err(|_| not_numeric())
}

fn mismatch_or_unknown(column: &str, value: &FieldValue) -> VehicleValidationError {
    if schema::descriptor(column).is_some() {
        VehicleValidationError::TypeMismatch {
            column: column.to_string(),
            value: value.clone(),
        }
    } else {
        VehicleValidationError::UnknownColumn(column.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{is_numeric_input, FieldValue, Vehicle, VehicleValidationError};
    use crate::schema;

    fn sample() -> Vehicle {
        Vehicle {
            v_num: 101,
            vin: "1FTFW1ET5DFC10312".to_string(),
            dept: "Parks".to_string(),
            year: Some(2013),
            make: "Ford".to_string(),
            model: "F-150".to_string(),
            class: "Light truck".to_string(),
            lic: "7ABC123".to_string(),
            motor: "Gas".to_string(),
            retired: "No".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn every_registered_column_maps_to_a_field() {
        let vehicle = sample();
        for field in schema::fields() {
            assert!(
                vehicle.value(field.column).is_some(),
                "column {} has no struct field",
                field.column
            );
        }
    }

    #[test]
    fn update_values_put_key_last() {
        let values = sample().update_values();
        assert_eq!(values.len(), schema::fields().len());
        assert_eq!(values[0], FieldValue::Text("1FTFW1ET5DFC10312".to_string()));
        assert_eq!(values.last(), Some(&FieldValue::Integer(101)));
    }

    #[test]
    fn from_form_parses_schema_ordered_inputs() {
        let inputs = [
            "7", "VIN7", "Finance", "", "Toyota", "Prius", "Compact", "", "Hybrid", "No", "pool",
        ];
        let vehicle = Vehicle::from_form(&inputs).unwrap();
        assert_eq!(vehicle.v_num, 7);
        assert_eq!(vehicle.year, None);
        assert_eq!(vehicle.motor, "Hybrid");
        assert!(vehicle.validate().is_ok());
    }

    #[test]
    fn from_form_rejects_non_numeric_integer_fields() {
        let err =
            Vehicle::from_form(&["7", "VIN7", "", "20x1", "", "", "", "", "", "", ""]).unwrap_err();
        assert!(matches!(err, VehicleValidationError::NotNumeric { column: "year", .. }));

        let err =
            Vehicle::from_form(&["", "VIN7", "", "", "", "", "", "", "", "", ""]).unwrap_err();
        assert!(matches!(err, VehicleValidationError::NotNumeric { column: "v_num", .. }));
    }

    #[test]
    fn from_form_rejects_wrong_field_count() {
        let err = Vehicle::from_form(&["1", "VIN"]).unwrap_err();
        assert_eq!(
            err,
            VehicleValidationError::WrongFieldCount {
                expected: 11,
                actual: 2
            }
        );
    }

    #[test]
    fn validate_requires_vin_and_allowed_choices() {
        let mut vehicle = sample();
        vehicle.vin = "  ".to_string();
        assert_eq!(vehicle.validate(), Err(VehicleValidationError::MissingVin));

        let mut vehicle = sample();
        vehicle.class = "Spaceship".to_string();
        assert!(matches!(
            vehicle.validate(),
            Err(VehicleValidationError::NotAllowed { column: "class", .. })
        ));

        let mut vehicle = sample();
        vehicle.v_num = 0;
        assert_eq!(
            vehicle.validate(),
            Err(VehicleValidationError::NonPositiveId(0))
        );
    }

    #[test]
    fn set_value_rejects_mismatched_types() {
        let mut vehicle = sample();
        let err = vehicle
            .set_value("make", FieldValue::Integer(3))
            .unwrap_err();
        assert!(matches!(err, VehicleValidationError::TypeMismatch { .. }));

        let err = vehicle
            .set_value("v_num", FieldValue::Null)
            .unwrap_err();
        assert!(matches!(err, VehicleValidationError::TypeMismatch { .. }));

        let err = vehicle
            .set_value("color", FieldValue::Text("red".to_string()))
            .unwrap_err();
        assert_eq!(err, VehicleValidationError::UnknownColumn("color".to_string()));
    }

    #[test]
    fn numeric_input_allows_wildcards_only_when_requested() {
        assert!(is_numeric_input("2013", false));
        assert!(!is_numeric_input("20%", false));
        assert!(is_numeric_input("20%", true));
        assert!(!is_numeric_input("2a%", true));
    }
}
