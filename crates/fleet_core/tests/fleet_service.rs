use fleet_core::{
    FleetService, NoopAuditSink, RepoError, SqliteFleetStore, Vehicle, VehicleValidationError,
};

fn service() -> FleetService<SqliteFleetStore> {
    FleetService::new(SqliteFleetStore::open_in_memory(NoopAuditSink).unwrap())
}

fn form_vehicle(v_num: &str, dept: &str, make: &str) -> Vehicle {
    Vehicle::from_form(&[
        v_num, "1HGCM82633A004352", dept, "2019", make, "Transit", "Van", "CA-1", "Diesel", "No",
        "",
    ])
    .unwrap()
}

#[test]
fn next_vehicle_number_starts_at_one_and_follows_max() {
    let mut service = service();
    assert_eq!(service.next_vehicle_number().unwrap(), 1);

    service.add_vehicle(&form_vehicle("40", "Parks", "Ford")).unwrap();
    service.add_vehicle(&form_vehicle("7", "Parks", "Ford")).unwrap();
    assert_eq!(service.next_vehicle_number().unwrap(), 41);
}

#[test]
fn add_vehicle_requires_vin_and_valid_choices() {
    let mut service = service();

    let mut missing_vin = form_vehicle("1", "Parks", "Ford");
    missing_vin.vin.clear();
    let err = service.add_vehicle(&missing_vin).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(VehicleValidationError::MissingVin)
    ));

    let bad_dept = form_vehicle("1", "Police", "Ford");
    let err = service.add_vehicle(&bad_dept).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(VehicleValidationError::NotAllowed { column: "dept", .. })
    ));

    assert!(service.list_all().unwrap().is_empty());
}

#[test]
fn submit_changes_rejects_deleted_vehicle() {
    let mut service = service();
    service.add_vehicle(&form_vehicle("3", "Parks", "Ford")).unwrap();

    let mut opened = service.inspect(3).unwrap().unwrap();
    service.delete_selected(&[3]).unwrap();

    opened.notes = "new tires".to_string();
    let err = service.submit_changes(&opened).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(3)));
    assert!(service.inspect(3).unwrap().is_none());
}

#[test]
fn submit_changes_persists_edits() {
    let mut service = service();
    service.add_vehicle(&form_vehicle("3", "Parks", "Ford")).unwrap();

    let mut opened = service.inspect(3).unwrap().unwrap();
    opened.dept = "Environmental".to_string();
    service.submit_changes(&opened).unwrap();

    assert_eq!(service.inspect(3).unwrap().unwrap().dept, "Environmental");
}

#[test]
fn delete_selected_counts_only_existing_rows() {
    let mut service = service();
    for id in ["1", "2", "3"] {
        service.add_vehicle(&form_vehicle(id, "Parks", "Ford")).unwrap();
    }

    assert_eq!(service.delete_selected(&[1, 3, 9]).unwrap(), 2);
    let remaining = service.list_all().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].v_num, 2);
}

#[test]
fn filter_from_form_skips_blanks_and_uses_wildcards() {
    let mut service = service();
    service.add_vehicle(&form_vehicle("1", "Parks", "Ford")).unwrap();
    service.add_vehicle(&form_vehicle("2", "Parks", "Dodge")).unwrap();
    service.add_vehicle(&form_vehicle("3", "Finance", "Ford")).unwrap();

    let rows = service
        .filter_from_form(&[("v_num", ""), ("dept", "Parks"), ("make", "F%"), ("notes", "")])
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].v_num, 1);

    let err = service
        .filter_from_form(&[("dept", ""), ("make", "")])
        .unwrap_err();
    assert!(matches!(err, RepoError::EmptyFilter));
}

#[test]
fn vehicle_serializes_with_column_names() {
    let vehicle = form_vehicle("5", "Utilities", "Ford");
    let json = serde_json::to_value(&vehicle).unwrap();
    let object = json.as_object().unwrap();

    for field in fleet_core::schema::fields() {
        assert!(object.contains_key(field.column), "missing {}", field.column);
    }
    assert_eq!(object.len(), fleet_core::schema::fields().len());
    assert_eq!(json["year"], serde_json::json!(2019));
}
