//! Fleet use-case service.
//!
//! # Responsibility
//! - Provide the workflows the presentation layer drives: add, inspect,
//!   submit changes, delete a selection, filter from form input.
//! - Apply validation and existence checks before delegating to the store.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Empty filter input is rejected here, before it reaches the store.

use crate::model::vehicle::{is_numeric_input, Vehicle, VehicleId, VehicleValidationError};
use crate::repo::fleet_repo::{FilterCriterion, FleetRepository, RepoError, RepoResult};
use crate::schema::{self, FieldKind, QueryMode};

/// Use-case service wrapper for fleet operations.
pub struct FleetService<R: FleetRepository> {
    repo: R,
}

impl<R: FleetRepository> FleetService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns the wrapped repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Suggests the key for a new vehicle: one past the largest stored key,
    /// or `1` for an empty fleet.
    pub fn next_vehicle_number(&self) -> RepoResult<VehicleId> {
        Ok(self.repo.max_vehicle_id()?.map_or(1, |max| max + 1))
    }

    /// Validates and inserts a new vehicle.
    pub fn add_vehicle(&mut self, vehicle: &Vehicle) -> RepoResult<VehicleId> {
        vehicle.validate()?;
        self.repo.insert_vehicle(vehicle)
    }

    /// Loads one vehicle for inspection.
    pub fn inspect(&self, id: VehicleId) -> RepoResult<Option<Vehicle>> {
        self.repo.get_vehicle(id)
    }

    /// Validates and writes edits to an existing vehicle.
    ///
    /// # Errors
    /// - `NotFound` when the vehicle was deleted after it was opened.
    pub fn submit_changes(&mut self, vehicle: &Vehicle) -> RepoResult<()> {
        vehicle.validate()?;
        if self.repo.get_vehicle(vehicle.v_num)?.is_none() {
            return Err(RepoError::NotFound(vehicle.v_num));
        }
        self.repo.update_vehicle(vehicle)
    }

    /// Deletes every id in `ids`, returning how many rows were removed.
    ///
    /// Stops at the first failing delete; earlier deletes stay committed.
    pub fn delete_selected(&mut self, ids: &[VehicleId]) -> RepoResult<usize> {
        let mut removed = 0;
        for id in ids {
            if self.repo.delete_vehicle(*id)? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Returns the whole fleet.
    pub fn list_all(&self) -> RepoResult<Vec<Vehicle>> {
        self.repo.list_vehicles()
    }

    /// Runs a filter built from `(column, raw value)` form input.
    pub fn filter_from_form(&self, inputs: &[(&str, &str)]) -> RepoResult<Vec<Vehicle>> {
        let criteria = build_filter_criteria(inputs)?;
        self.repo.filter_vehicles(&criteria)
    }
}

/// Translates filter form input into store criteria.
///
/// Blank values are skipped. Free-text fields whose value contains `%` use a
/// wildcard match; dropdown and radio fields always match exactly. Integer
/// fields accept digits and `%` only.
///
/// # Errors
/// - `UnknownColumn` for a column missing from the registry.
/// - `Validation` for non-numeric input to an integer field.
/// - `EmptyFilter` when every value is blank.
pub fn build_filter_criteria(inputs: &[(&str, &str)]) -> RepoResult<Vec<FilterCriterion>> {
    let mut criteria = Vec::new();
    for (column, value) in inputs {
        if value.is_empty() {
            continue;
        }
        let field = schema::descriptor(column)
            .ok_or_else(|| RepoError::UnknownColumn((*column).to_string()))?;

        if field.kind == FieldKind::Integer && !is_numeric_input(value, true) {
            return Err(VehicleValidationError::NotNumeric {
                column: field.column,
                value: (*value).to_string(),
            }
            .into());
        }

        let criterion = match field.query_mode {
            QueryMode::ExactString if value.contains('%') => {
                FilterCriterion::wildcard(field.column, *value)
            }
            QueryMode::ExactString | QueryMode::Dropdown | QueryMode::Radio => {
                FilterCriterion::exact(field.column, *value)
            }
        };
        criteria.push(criterion);
    }

    if criteria.is_empty() {
        return Err(RepoError::EmptyFilter);
    }
    Ok(criteria)
}

#[cfg(test)]
mod tests {
    use super::build_filter_criteria;
    use crate::repo::fleet_repo::{MatchMode, RepoError};

    #[test]
    fn blank_inputs_are_skipped_and_percent_switches_to_wildcard() {
        let criteria =
            build_filter_criteria(&[("v_num", ""), ("make", "Fo%"), ("dept", "Parks")]).unwrap();
        assert_eq!(criteria.len(), 2);
        assert_eq!(criteria[0].column, "make");
        assert_eq!(criteria[0].mode, MatchMode::Wildcard);
        assert_eq!(criteria[1].column, "dept");
        assert_eq!(criteria[1].mode, MatchMode::Exact);
    }

    #[test]
    fn choice_fields_never_use_wildcards() {
        let criteria = build_filter_criteria(&[("notes", "x"), ("dept", "%")]).unwrap();
        assert_eq!(criteria[1].mode, MatchMode::Exact);
    }

    #[test]
    fn all_blank_input_is_rejected() {
        let err = build_filter_criteria(&[("make", ""), ("dept", "")]).unwrap_err();
        assert!(matches!(err, RepoError::EmptyFilter));
    }

    #[test]
    fn unknown_column_is_rejected() {
        let err = build_filter_criteria(&[("color", "red")]).unwrap_err();
        assert!(matches!(err, RepoError::UnknownColumn(column) if column == "color"));
    }

    #[test]
    fn integer_fields_accept_digits_and_wildcards_only() {
        let criteria = build_filter_criteria(&[("year", "20%")]).unwrap();
        assert_eq!(criteria[0].mode, MatchMode::Wildcard);

        let err = build_filter_criteria(&[("year", "twenty")]).unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }
}
