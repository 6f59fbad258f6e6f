use std::path::Path;

use rac_core::db::SqliteKeyValueStore;
use rac_core::RecordService;

use crate::commands::common::{normalize_record_identifier, open_database, resolve_record};
use crate::error::CliError;

pub fn run_delete(id: &str, db_path: &Path) -> Result<(), CliError> {
    let normalized_id = normalize_record_identifier(id)?;
    let db = open_database(db_path)?;
    let store = SqliteKeyValueStore::new(db.connection());
    let mut records = RecordService::open(&store);
    let record = resolve_record(&normalized_id, &records)?;

    let removed = records.delete(&record.id)?;
    println!("{}", removed.id);
    Ok(())
}
