use std::path::Path;

use rac_core::db::SqliteKeyValueStore;
use rac_core::RecordService;

use crate::cli::FilterArgs;
use crate::commands::common::{build_filter, format_summary_lines, open_database, summary_to_item};
use crate::error::CliError;

pub fn run_summary(filter: &FilterArgs, as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let records = RecordService::open(SqliteKeyValueStore::new(db.connection()));
    let summary = records.summarize(&build_filter(filter));

    if as_json {
        println!("{}", serde_json::to_string_pretty(&summary_to_item(&summary))?);
    } else {
        for line in format_summary_lines(&summary) {
            println!("{line}");
        }
    }

    Ok(())
}
