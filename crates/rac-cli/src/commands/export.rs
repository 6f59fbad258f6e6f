use std::path::Path;

use rac_core::db::SqliteKeyValueStore;
use rac_core::export::ExportKind;
use rac_core::RecordService;

use crate::cli::{ExportFormat, FilterArgs};
use crate::commands::common::{build_filter, open_database, write_output};
use crate::error::CliError;

pub fn run_export(
    format: ExportFormat,
    output_path: Option<&Path>,
    filter: &FilterArgs,
    db_path: &Path,
) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let records = RecordService::open(SqliteKeyValueStore::new(db.connection()));

    let (rendered, kind) = match format {
        ExportFormat::Csv => (records.export_csv(&build_filter(filter)), ExportKind::Csv),
        ExportFormat::Json => (records.export_backup()?, ExportKind::Backup),
    };

    write_output(&rendered, output_path, kind)
}
