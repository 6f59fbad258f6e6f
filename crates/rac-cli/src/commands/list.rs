use std::path::Path;

use rac_core::db::SqliteKeyValueStore;
use rac_core::RecordService;

use crate::cli::FilterArgs;
use crate::commands::common::{build_filter, format_record_lines, open_database};
use crate::error::CliError;

pub fn run_list(
    filter: &FilterArgs,
    limit: Option<usize>,
    as_json: bool,
    db_path: &Path,
) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let records = RecordService::open(SqliteKeyValueStore::new(db.connection()));

    let mut matching = records.filter(&build_filter(filter));
    if let Some(limit) = limit {
        matching.truncate(limit);
    }

    if as_json {
        println!("{}", serde_json::to_string_pretty(&matching)?);
    } else {
        for line in format_record_lines(&matching) {
            println!("{line}");
        }
    }

    Ok(())
}
