//! CLI smoke entry point.
//!
//! # Responsibility
//! - Drive one parcel lifecycle against a real SQLite file.
//! - Read configuration from environment variables only.

use log::warn;
use parcel_core::db::{open_db, open_db_in_memory};
use parcel_core::{
    core_version, default_log_level, init_logging, ClientId, ParcelService,
    SqliteParcelRepository,
};
use std::env;
use std::error::Error;

const DEFAULT_DB_PATH: &str = "tracker.db";
const IN_MEMORY_DB_PATH: &str = ":memory:";
const DEMO_CLIENT: ClientId = 1000;

struct CliConfig {
    db_path: String,
    log_level: String,
    log_dir: Option<String>,
}

impl CliConfig {
    fn from_env() -> Self {
        Self {
            db_path: env::var("PARCEL_DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string()),
            log_level: env::var("PARCEL_LOG_LEVEL")
                .unwrap_or_else(|_| default_log_level().to_string()),
            log_dir: env::var("PARCEL_LOG_DIR")
                .ok()
                .filter(|dir| !dir.trim().is_empty()),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = CliConfig::from_env();
    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(&config.log_level, log_dir)?;
    }

    println!("parcel_core version={}", core_version());

    let conn = if config.db_path == IN_MEMORY_DB_PATH {
        open_db_in_memory()?
    } else {
        open_db(&config.db_path)?
    };
    let service = ParcelService::new(SqliteParcelRepository::try_new(&conn)?);

    let parcel = service.register(DEMO_CLIENT, "Pskov, Voennaya 15")?;
    println!(
        "registered parcel number={} client={} address={} created_at={}",
        parcel.number, parcel.client, parcel.address, parcel.created_at
    );
    print_client_parcels(&service, DEMO_CLIENT)?;

    service.change_address(parcel.number, "Saratov, Verkhnyaya 3")?;
    println!("changed address of parcel {}", parcel.number);

    if let Some(status) = service.next_status(parcel.number)? {
        println!("parcel {} moved to {}", parcel.number, status);
    }

    // Both calls are no-ops now that the parcel has left `registered`.
    service.change_address(parcel.number, "Moscow, Lenina 1")?;
    service.delete(parcel.number)?;
    let current = service.get(parcel.number)?;
    if current.address != "Saratov, Verkhnyaya 3" {
        warn!(
            "event=cli_smoke module=cli status=error number={} reason=address_changed_after_send",
            parcel.number
        );
    }
    print_client_parcels(&service, DEMO_CLIENT)?;

    let second = service.register(DEMO_CLIENT, "Kazan, Bauman 7")?;
    println!("registered parcel number={}", second.number);
    service.delete(second.number)?;
    println!("deleted parcel {}", second.number);
    print_client_parcels(&service, DEMO_CLIENT)?;

    Ok(())
}

fn print_client_parcels(
    service: &ParcelService<SqliteParcelRepository<'_>>,
    client: ClientId,
) -> Result<(), Box<dyn Error>> {
    let parcels = service.client_parcels(client)?;
    println!("client {client} has {} parcel(s):", parcels.len());
    for parcel in parcels {
        println!(
            "  number={} status={} address={} created_at={}",
            parcel.number, parcel.status, parcel.address, parcel.created_at
        );
    }
    Ok(())
}
