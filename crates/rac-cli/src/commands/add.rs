use std::path::Path;

use rac_core::db::SqliteKeyValueStore;
use rac_core::{RecordDraft, RecordService, TaxonomyStore};

use crate::cli::RecordArgs;
use crate::commands::common::{apply_record_args, open_database};
use crate::config::CliConfig;
use crate::error::CliError;

pub fn run_add(args: &RecordArgs, defaults: &CliConfig, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let store = SqliteKeyValueStore::new(db.connection());
    let taxonomy = TaxonomyStore::load(&store);
    let mut records = RecordService::open(&store);

    let mut draft = RecordDraft::new(taxonomy.taxonomy());
    defaults.apply_defaults(&mut draft);
    apply_record_args(&mut draft, args)?;

    let record = records.submit(&draft)?;
    println!("{}", record.id);
    Ok(())
}
