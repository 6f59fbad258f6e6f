use std::path::Path;

use rac_core::db::SqliteKeyValueStore;
use rac_core::RecordService;

use crate::commands::common::open_database;
use crate::error::CliError;

pub fn run_import(path: &Path, db_path: &Path) -> Result<(), CliError> {
    let raw = std::fs::read_to_string(path)?;

    let db = open_database(db_path)?;
    let mut records = RecordService::open(SqliteKeyValueStore::new(db.connection()));
    let count = records.import_backup(&raw)?;

    println!("Imported {count} records");
    Ok(())
}
