//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open the SQLite slot store the way an embedding app would.
//! - Print a deterministic summary of the persisted board.

use std::process::ExitCode;
use taskdeck_core::db::open_db;
use taskdeck_core::{
    core_version, init_logging, RuntimeConfig, SqliteSlotStorage, StoreConfig, SystemClock,
    TaskStatus, TaskStore,
};

fn main() -> ExitCode {
    let config = match RuntimeConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("taskdeck: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(config.log_level, log_dir) {
            eprintln!("taskdeck: logging disabled: {err}");
        }
    }

    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("taskdeck: cannot open {}: {err}", config.db_path.display());
            return ExitCode::FAILURE;
        }
    };
    let storage = match SqliteSlotStorage::try_new(&conn) {
        Ok(storage) => storage,
        Err(err) => {
            eprintln!("taskdeck: {err}");
            return ExitCode::FAILURE;
        }
    };

    let store = TaskStore::open(storage, SystemClock, StoreConfig::default());
    println!("taskdeck_core version={}", core_version());
    println!("db={} tasks={}", config.db_path.display(), store.len());
    for status in TaskStatus::ALL {
        println!("{status}={}", store.tasks_by_status(status).len());
    }
    ExitCode::SUCCESS
}
