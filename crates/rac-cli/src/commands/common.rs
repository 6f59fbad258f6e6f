use std::env;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::Local;
use rac_core::db::Database;
use rac_core::export::{suggested_export_file_name, ExportKind};
use rac_core::models::{Classification, VoiceNote, MAX_COUNTERPARTIES};
use rac_core::search::ALL_UNITS;
use rac_core::{Record, RecordDraft, RecordFilter, RecordService, Summary, UnitFilter};
use serde::Serialize;

use crate::cli::{FilterArgs, RecordArgs};
use crate::error::CliError;

const SHORT_ID_LEN: usize = 13;

#[derive(Debug, Serialize)]
pub struct SummaryItem {
    pub count: usize,
    pub estimated_minutes: u32,
    pub estimated_hours: f64,
    pub counts_by_group: Vec<GroupCountItem>,
}

#[derive(Debug, Serialize)]
pub struct GroupCountItem {
    pub label: String,
    pub count: usize,
}

pub fn summary_to_item(summary: &Summary) -> SummaryItem {
    SummaryItem {
        count: summary.count,
        estimated_minutes: summary.estimated_minutes,
        estimated_hours: summary.estimated_hours(),
        counts_by_group: summary
            .counts_by_group
            .iter()
            .map(|(label, count)| GroupCountItem {
                label: label.clone(),
                count: *count,
            })
            .collect(),
    }
}

pub fn build_filter(args: &FilterArgs) -> RecordFilter {
    RecordFilter {
        text: args.text.clone().unwrap_or_default(),
        unit: UnitFilter::parse(args.unit.as_deref().unwrap_or(ALL_UNITS)),
        date_from: args.from,
        date_to: args.to,
    }
}

/// Apply the fields given on the command line to a draft.
pub fn apply_record_args(draft: &mut RecordDraft, args: &RecordArgs) -> Result<(), CliError> {
    if let Some(unit) = &args.unit {
        draft.unit = unit.trim().to_string();
    }
    if let Some(activity) = &args.activity {
        draft.set_activity(activity);
    }
    if let Some(interaction) = &args.interaction {
        draft.set_interaction(interaction);
    }

    if !args.counterparties.is_empty() {
        if !matches!(draft.classification(), Classification::Interaction { .. }) {
            return Err(CliError::CounterpartiesWithoutInteraction);
        }
        if args.counterparties.len() > MAX_COUNTERPARTIES {
            tracing::warn!(
                "Only the first {MAX_COUNTERPARTIES} counterparties are kept ({} given)",
                args.counterparties.len()
            );
        }
        draft.set_counterparties(&args.counterparties);
    }

    if let Some(duration) = &args.duration {
        draft.duration = duration.trim().to_string();
    }
    if let Some(difficulty) = args.difficulty {
        draft.difficulty = difficulty.into();
    }
    if args.urgent {
        draft.urgent = true;
    } else if args.not_urgent {
        draft.urgent = false;
    }
    if let Some(date) = args.date {
        draft.date = date;
    }
    if let Some(time) = args.time {
        draft.time = time;
    }
    if let Some(notes) = &args.notes {
        draft.notes = Some(notes.clone());
    }
    if let Some(path) = &args.voice_note {
        draft.voice_note = Some(voice_note_from_file(path)?);
    }

    Ok(())
}

/// Encode an audio file as a `data:` URL voice note.
pub fn voice_note_from_file(path: &Path) -> Result<VoiceNote, CliError> {
    let bytes = std::fs::read(path)?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Ok(VoiceNote::new(format!(
        "data:{mime};base64,{}",
        STANDARD.encode(bytes)
    )))
}

pub fn normalize_record_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyRecordId)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Find a record by exact id or unique id prefix.
pub fn resolve_record<S: rac_core::db::KeyValueStore>(
    query: &str,
    records: &RecordService<S>,
) -> Result<Record, CliError> {
    if let Some(record) = records
        .records()
        .iter()
        .find(|record| record.id.as_str() == query)
    {
        return Ok(record.clone());
    }

    let matching = records
        .records()
        .iter()
        .filter(|record| record.id.as_str().starts_with(query))
        .collect::<Vec<_>>();

    match matching.as_slice() {
        [] => Err(CliError::RecordNotFound(query.to_string())),
        [record] => Ok((*record).clone()),
        _ => {
            let options = matching
                .iter()
                .take(3)
                .map(|record| short_id(record))
                .collect::<Vec<_>>()
                .join(", ");

            Err(CliError::AmbiguousRecordId(format!(
                "ID prefix '{query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

pub fn short_id(record: &Record) -> String {
    record.id.as_str().chars().take(SHORT_ID_LEN).collect()
}

pub fn format_record_lines(records: &[&Record]) -> Vec<String> {
    records
        .iter()
        .map(|record| {
            let mut line = format!(
                "{:<13}  {} {}  {:<6}  {}",
                short_id(record),
                record.date,
                record.time_label(),
                record.unit,
                record.classification()
            );
            if !record.counterparties.is_empty() {
                line.push_str(" with ");
                line.push_str(&record.counterparties.join(", "));
            }
            line.push_str("  (");
            line.push_str(&record.duration);
            line.push(')');
            if record.urgent {
                line.push_str("  [urgent]");
            }
            line
        })
        .collect()
}

pub fn format_summary_lines(summary: &Summary) -> Vec<String> {
    let mut lines = vec![
        format!("Records: {}", summary.count),
        format!(
            "Estimated time: {:.1} h ({} min)",
            summary.estimated_hours(),
            summary.estimated_minutes
        ),
    ];

    if !summary.counts_by_group.is_empty() {
        let width = summary
            .counts_by_group
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);
        lines.push("By group:".to_string());
        lines.extend(
            summary
                .counts_by_group
                .iter()
                .map(|(label, count)| format!("  {label:<width$}  {count}")),
        );
    }

    lines
}

/// Write an export to `output`, or stdout when omitted.
///
/// A directory output receives the suggested dated file name.
pub fn write_output(
    rendered: &str,
    output_path: Option<&Path>,
    kind: ExportKind,
) -> Result<(), CliError> {
    let Some(path) = output_path else {
        println!("{rendered}");
        return Ok(());
    };

    let path = if path.is_dir() {
        path.join(suggested_export_file_name(kind, Local::now().date_naive()))
    } else {
        path.to_path_buf()
    };
    std::fs::write(&path, rendered)?;
    println!("{}", path.display());
    Ok(())
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> Result<PathBuf, CliError> {
    if let Some(path) = cli_db_path.or_else(|| env::var_os("RAC_DB_PATH").map(PathBuf::from)) {
        return Ok(path);
    }
    default_db_path()
}

pub fn default_db_path() -> Result<PathBuf, CliError> {
    dirs::data_dir()
        .map(|dir| dir.join("rac").join("rac.db"))
        .ok_or_else(|| CliError::Config("Failed to resolve CLI data directory".to_string()))
}

pub fn open_database(path: &Path) -> Result<Database, CliError> {
    Ok(Database::open(path)?)
}
