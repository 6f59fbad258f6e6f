use std::path::Path;

use rac_core::db::SqliteKeyValueStore;
use rac_core::{RecordDraft, RecordService};

use crate::cli::RecordArgs;
use crate::commands::common::{
    apply_record_args, normalize_record_identifier, open_database, resolve_record,
};
use crate::error::CliError;

pub fn run_edit(
    id: &str,
    args: &RecordArgs,
    clear_voice_note: bool,
    db_path: &Path,
) -> Result<(), CliError> {
    let normalized_id = normalize_record_identifier(id)?;
    let db = open_database(db_path)?;
    let store = SqliteKeyValueStore::new(db.connection());
    let mut records = RecordService::open(&store);
    let record = resolve_record(&normalized_id, &records)?;

    let mut draft = RecordDraft::from_record(&record);
    apply_record_args(&mut draft, args)?;
    if clear_voice_note {
        draft.voice_note = None;
    }

    let updated = records.submit(&draft)?;
    println!("{}", updated.id);
    Ok(())
}
