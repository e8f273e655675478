//! Headless fleet probe.
//!
//! # Responsibility
//! - Open `fleet.db` in the working directory the way the desktop front end
//!   does and print the current fleet.
//! - Keep output deterministic for quick local sanity checks.

use fleet_core::config::DEFAULT_DB_FILE_NAME;
use fleet_core::{default_log_level, init_logging, schema, FleetService, SqliteFleetStore};
use log::info;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("fleet_core version={}", fleet_core::core_version());

    match std::env::current_dir() {
        Ok(cwd) => {
            let log_dir = cwd.join("logs");
            if let Err(err) = init_logging(default_log_level(), &log_dir.to_string_lossy()) {
                eprintln!("logging disabled: {err}");
            }
        }
        Err(err) => eprintln!("logging disabled: {err}"),
    }
    info!("event=cli_start module=cli status=ok");

    let store = match SqliteFleetStore::open(DEFAULT_DB_FILE_NAME, |entry: &str| {
        println!("[log] {entry}")
    }) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    let service = FleetService::new(store);

    let vehicles = match service.list_all() {
        Ok(vehicles) => vehicles,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let header: Vec<&str> = schema::fields().iter().map(|field| field.label).collect();
    println!("{}", header.join(" | "));
    for vehicle in &vehicles {
        let cells: Vec<String> = vehicle
            .values()
            .iter()
            .map(|value| value.to_string())
            .collect();
        println!("{}", cells.join(" | "));
    }
    println!("{} vehicle(s)", vehicles.len());

    ExitCode::SUCCESS
}
