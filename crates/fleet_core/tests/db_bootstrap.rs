use fleet_core::db::{open_db, open_db_in_memory, DbError};
use fleet_core::{
    schema, FieldValue, FilterCriterion, FleetRepository, NoopAuditSink, RepoError,
    SqliteFleetStore, Vehicle,
};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_fleet_table_in_schema_order() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(table_columns(&conn), schema::column_names());
}

#[test]
fn reopening_file_keeps_existing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fleet.db");

    {
        let mut store = SqliteFleetStore::open(&path, NoopAuditSink).unwrap();
        store.insert_vehicle(&Vehicle::new(12, "VIN12")).unwrap();
    }

    let store = SqliteFleetStore::open(&path, NoopAuditSink).unwrap();
    let loaded = store.get_vehicle(12).unwrap().unwrap();
    assert_eq!(loaded.vin, "VIN12");

    let conn = open_db(&path).unwrap();
    assert_eq!(table_columns(&conn), schema::column_names());
}

#[test]
fn unopenable_path_reports_store_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("fleet.db");

    let result = SqliteFleetStore::open(&path, NoopAuditSink);
    assert!(matches!(
        result,
        Err(RepoError::StoreUnavailable(DbError::Sqlite(_)))
    ));
}

#[test]
fn existing_table_missing_columns_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("CREATE TABLE fleet (v_num INTEGER PRIMARY KEY, vin TEXT);")
        .unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::IncompatibleTable { missing_columns } => {
            assert_eq!(missing_columns.len(), 9);
            assert_eq!(missing_columns[0], "dept");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn rows_written_as_text_by_desktop_app_are_readable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fleet.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS fleet (v_num integer PRIMARY KEY, vin text, dept text, \
         year number, make text, model text, class text, lic text, motor text, \
         retired string, notes text);",
    )
    .unwrap();
    let insert = "INSERT INTO fleet (v_num, vin, dept, year, make, model, class, lic, motor, \
                  retired, notes) VALUES (?,?,?,?,?,?,?,?,?,?,?);";
    conn.execute(
        insert,
        ["1", "VIN1", "Parks", "", "Ford", "F-150", "Light truck", "7ABC", "Gas", "No", ""],
    )
    .unwrap();
    conn.execute(
        insert,
        ["2", "VIN2", "Finance", "2018", "Toyota", "Prius", "Compact", "8XYZ", "Hybrid", "No", "x"],
    )
    .unwrap();
    conn.execute(
        insert,
        ["3", "VIN3", "Parks", " ", "Dodge", "Ram", "Van", "9QRS", "Diesel", "Yes", ""],
    )
    .unwrap();
    drop(conn);

    let mut store = SqliteFleetStore::open(&path, NoopAuditSink).unwrap();
    assert_eq!(store.list_vehicles().unwrap().len(), 3);

    let blank_year = store.get_vehicle(1).unwrap().unwrap();
    assert_eq!(blank_year.year, None);
    assert_eq!(blank_year.make, "Ford");
    assert_eq!(store.get_vehicle(2).unwrap().unwrap().year, Some(2018));
    assert_eq!(store.get_vehicle(3).unwrap().unwrap().year, None);
    assert_eq!(store.vehicle_value("year", 1).unwrap(), Some(FieldValue::Null));

    let parks = store
        .filter_vehicles(&[FilterCriterion::exact("dept", "Parks")])
        .unwrap();
    assert_eq!(parks.len(), 2);

    assert!(store.delete_vehicle(1).unwrap());
    assert!(store.get_vehicle(1).unwrap().is_none());
    assert_eq!(store.list_vehicles().unwrap().len(), 2);
}

#[test]
fn non_numeric_text_in_integer_column_is_invalid_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fleet.db");
    let mut store = SqliteFleetStore::open(&path, NoopAuditSink).unwrap();
    store.insert_vehicle(&Vehicle::new(4, "VIN4")).unwrap();

    let conn = Connection::open(&path).unwrap();
    conn.execute("UPDATE fleet SET year = 'soon' WHERE v_num = 4;", [])
        .unwrap();
    drop(conn);

    assert!(matches!(
        store.get_vehicle(4).unwrap_err(),
        RepoError::InvalidData(_)
    ));
    assert!(store.delete_vehicle(4).unwrap());
}

fn table_columns(conn: &Connection) -> Vec<String> {
    let mut stmt = conn.prepare("PRAGMA table_info(fleet);").unwrap();
    let columns = stmt
        .query_map([], |row| row.get::<_, String>("name"))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    columns
}
