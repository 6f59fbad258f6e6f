//! Record and taxonomy export/import codecs (CSV, JSON backup).

use std::borrow::Cow;
use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ImportError;
use crate::models::{Record, RecordId};

/// CSV header, in column order. `voiceNote` is never exported to CSV.
pub const CSV_HEADERS: [&str; 11] = [
    "id",
    "unit",
    "activity",
    "interaction",
    "counterparties",
    "duration",
    "difficulty",
    "urgent",
    "date",
    "time",
    "notes",
];

/// Token written for urgent records
pub const URGENT_YES: &str = "Sim";
/// Token written for non-urgent records
pub const URGENT_NO: &str = "Não";

const COUNTERPARTY_SEPARATOR: &str = "; ";

/// Required backup fields, with the legacy key accepted for each.
const REQUIRED_BACKUP_FIELDS: [(&str, &str); 3] = [("id", "id"), ("date", "data"), ("time", "hora")];

/// The three kinds of file a user can download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportKind {
    /// Filtered records as CSV
    Csv,
    /// Every record as a JSON backup
    Backup,
    /// The taxonomy as JSON
    Taxonomy,
}

impl ExportKind {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Backup | Self::Taxonomy => "json",
        }
    }

    const fn file_stem(self) -> &'static str {
        match self {
            Self::Csv => "rac_export",
            Self::Backup => "rac_backup",
            Self::Taxonomy => "rac_options",
        }
    }
}

/// Render records as CSV, one row per record in input order.
///
/// Rows are separated by `\n` with no trailing newline.
#[must_use]
pub fn render_csv_export<'a>(records: impl IntoIterator<Item = &'a Record>) -> String {
    let mut lines = vec![CSV_HEADERS.join(",")];

    for record in records {
        let counterparties = record.counterparties.join(COUNTERPARTY_SEPARATOR);
        let date = record.date.to_string();
        let time = record.time_label();
        let cells: [&str; 11] = [
            record.id.as_str(),
            &record.unit,
            record.activity.as_deref().unwrap_or(""),
            record.interaction.as_deref().unwrap_or(""),
            &counterparties,
            &record.duration,
            record.difficulty.label(),
            if record.urgent { URGENT_YES } else { URGENT_NO },
            &date,
            &time,
            record.notes.as_deref().unwrap_or(""),
        ];

        lines.push(
            cells
                .iter()
                .map(|cell| escape_csv_cell(cell))
                .collect::<Vec<_>>()
                .join(","),
        );
    }

    lines.join("\n")
}

/// Quote a cell containing a comma, double quote or newline.
#[must_use]
pub fn escape_csv_cell(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Render every record as a pretty-printed JSON array.
pub fn render_json_backup(records: &[Record]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}

/// Parse a JSON backup.
///
/// The whole document is rejected if it is not an array, or if any element
/// lacks `id`, `date` or `time`, fails to deserialize, or repeats an id.
pub fn parse_json_backup(raw: &str) -> Result<Vec<Record>, ImportError> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let serde_json::Value::Array(elements) = value else {
        return Err(ImportError::Structure(
            "backup must be a JSON array of records".to_string(),
        ));
    };

    let mut seen = HashSet::<RecordId>::new();
    let mut records = Vec::with_capacity(elements.len());

    for (index, element) in elements.into_iter().enumerate() {
        for (field, legacy) in REQUIRED_BACKUP_FIELDS {
            if !has_required_value(&element, field) && !has_required_value(&element, legacy) {
                return Err(ImportError::Field {
                    index,
                    message: format!("missing required field `{field}`"),
                });
            }
        }

        let record: Record = serde_json::from_value(element).map_err(|error| ImportError::Field {
            index,
            message: error.to_string(),
        })?;

        if !seen.insert(record.id.clone()) {
            return Err(ImportError::Field {
                index,
                message: format!("duplicate id `{}`", record.id),
            });
        }
        records.push(record);
    }

    Ok(records)
}

fn has_required_value(element: &serde_json::Value, field: &str) -> bool {
    match element.get(field) {
        Some(serde_json::Value::String(value)) => !value.is_empty(),
        Some(serde_json::Value::Null) | None => false,
        Some(_) => true,
    }
}

/// Build the default download name for an export, embedding the date.
#[must_use]
pub fn suggested_export_file_name(kind: ExportKind, date: NaiveDate) -> String {
    format!(
        "{}_{}.{}",
        kind.file_stem(),
        date.format("%Y-%m-%d"),
        kind.extension()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, VoiceNote};
    use chrono::NaiveTime;
    use pretty_assertions::assert_eq;

    fn record(id: &str) -> Record {
        Record {
            id: id.parse().unwrap(),
            unit: "CJ".to_string(),
            activity: Some("Estudos temáticos".to_string()),
            interaction: None,
            counterparties: Vec::new(),
            duration: "Até 5 min".to_string(),
            difficulty: Difficulty::Unset,
            urgent: false,
            date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            notes: None,
            voice_note: None,
        }
    }

    fn interaction_record(id: &str) -> Record {
        Record {
            activity: None,
            interaction: Some("Parecer".to_string()),
            counterparties: vec!["Julio".to_string(), "AJG".to_string()],
            difficulty: Difficulty::VeryHigh,
            urgent: true,
            notes: Some(String::new()),
            voice_note: Some(VoiceNote::new("data:audio/webm;base64,GkXfo0")),
            ..record(id)
        }
    }

    #[test]
    fn render_csv_export_writes_header_and_rows() {
        let rendered = render_csv_export(&[record("a"), interaction_record("b")]);
        let lines = rendered.lines().collect::<Vec<_>>();

        assert_eq!(
            lines[0],
            "id,unit,activity,interaction,counterparties,duration,difficulty,urgent,date,time,notes"
        );
        assert_eq!(
            lines[1],
            "a,CJ,Estudos temáticos,,,Até 5 min,,Não,2024-07-01,09:30,"
        );
        assert_eq!(
            lines[2],
            "b,CJ,,Parecer,Julio; AJG,Até 5 min,Altíssima,Sim,2024-07-01,09:30,"
        );
        assert!(!rendered.contains("GkXfo0"));
        assert!(!rendered.ends_with('\n'));
    }

    #[test]
    fn render_csv_export_escapes_special_cells() {
        let mut noted = record("a");
        noted.notes = Some("said \"hi\", then\nleft".to_string());
        let mut plain = record("b");
        plain.notes = Some("plain note 42".to_string());

        let rendered = render_csv_export(&[noted, plain]);

        assert!(rendered.contains(",\"said \"\"hi\"\", then\nleft\""));
        assert!(rendered.ends_with(",plain note 42"));
    }

    #[test]
    fn render_csv_export_of_nothing_is_header_only() {
        assert_eq!(render_csv_export(std::iter::empty()), CSV_HEADERS.join(","));
    }

    #[test]
    fn escape_csv_cell_only_quotes_when_needed() {
        assert_eq!(escape_csv_cell("abc"), "abc");
        assert_eq!(escape_csv_cell("a,b"), "\"a,b\"");
        assert_eq!(escape_csv_cell("say \"x\""), "\"say \"\"x\"\"\"");
        assert_eq!(escape_csv_cell("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn json_backup_round_trips_exactly() {
        let mut sparse = record("sparse");
        sparse.activity = Some(String::new());
        sparse.interaction = Some("Cota".to_string());
        sparse.counterparties = vec!["Fenili".to_string()];
        let records = vec![record("a"), interaction_record("b"), sparse];

        let rendered = render_json_backup(&records).unwrap();
        assert!(rendered.starts_with("[\n  {"));
        assert_eq!(parse_json_backup(&rendered).unwrap(), records);
    }

    #[test]
    fn parse_json_backup_rejects_non_arrays() {
        assert!(matches!(
            parse_json_backup("{\"id\": \"a\"}"),
            Err(ImportError::Structure(_))
        ));
        assert!(matches!(
            parse_json_backup("[{"),
            Err(ImportError::Parse(_))
        ));
    }

    #[test]
    fn parse_json_backup_requires_id_date_and_time() {
        let raw = r#"[
            {"id": "a", "date": "2024-01-01", "time": "08:00"},
            {"id": "b", "date": "2024-01-01"}
        ]"#;
        let error = parse_json_backup(raw).unwrap_err();
        assert_eq!(
            error,
            ImportError::Field {
                index: 1,
                message: "missing required field `time`".to_string(),
            }
        );

        let empty_id = r#"[{"id": "", "date": "2024-01-01", "time": "08:00"}]"#;
        assert!(matches!(
            parse_json_backup(empty_id),
            Err(ImportError::Field { index: 0, .. })
        ));
    }

    #[test]
    fn parse_json_backup_rejects_bad_values_and_duplicates() {
        let bad_time = r#"[{"id": "a", "date": "2024-01-01", "time": "8 o'clock"}]"#;
        assert!(matches!(
            parse_json_backup(bad_time),
            Err(ImportError::Field { index: 0, .. })
        ));

        let duplicate = r#"[
            {"id": "a", "date": "2024-01-01", "time": "08:00"},
            {"id": "a", "date": "2024-01-02", "time": "09:00"}
        ]"#;
        assert!(matches!(
            parse_json_backup(duplicate),
            Err(ImportError::Field { index: 1, .. })
        ));
    }

    #[test]
    fn parse_json_backup_accepts_legacy_backups() {
        let raw = r#"[{
            "id": "0b6f", "unidade": "CJ", "atividade": "CEAI", "interacao": "",
            "comQuem": [], "duracao": "Até 5 min", "dificuldade": "",
            "urgente": false, "data": "2024-01-01", "hora": "07:00",
            "observacoes": ""
        }]"#;

        let records = parse_json_backup(raw).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].activity(), Some("CEAI"));
        assert_eq!(records[0].notes.as_deref(), Some(""));
    }

    #[test]
    fn parse_json_backup_accepts_legacy_nulls() {
        let raw = r#"[{
            "id": "legacy", "unidade": null, "atividade": "", "interacao": "Parecer",
            "comQuem": null, "duracao": null, "dificuldade": null,
            "urgente": null, "data": "2024-01-02", "hora": "09:00"
        }]"#;

        let records = parse_json_backup(raw).unwrap();
        assert_eq!(records[0].interaction(), Some("Parecer"));
        assert!(records[0].counterparties.is_empty());
        assert_eq!(records[0].difficulty, Difficulty::Unset);
        assert!(!records[0].urgent);
    }

    #[test]
    fn parse_json_backup_accepts_empty_array() {
        assert!(parse_json_backup("[]").unwrap().is_empty());
    }

    #[test]
    fn suggested_export_file_name_embeds_date() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(
            suggested_export_file_name(ExportKind::Csv, date),
            "rac_export_2024-12-31.csv"
        );
        assert_eq!(
            suggested_export_file_name(ExportKind::Backup, date),
            "rac_backup_2024-12-31.json"
        );
        assert_eq!(
            suggested_export_file_name(ExportKind::Taxonomy, date),
            "rac_options_2024-12-31.json"
        );
    }
}
