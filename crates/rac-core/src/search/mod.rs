//! Record filtering and summary aggregation.
//!
//! Everything here is a pure function over an in-memory slice: no storage
//! access, and results keep the input order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Record;

/// Sentinel accepted by [`UnitFilter::parse`] for "every unit".
pub const ALL_UNITS: &str = "all";

/// Unit dimension of a [`RecordFilter`]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnitFilter {
    #[default]
    All,
    Only(String),
}

impl UnitFilter {
    /// `"all"` (or the legacy `"todas"`) and blanks mean every unit.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty()
            || value.eq_ignore_ascii_case(ALL_UNITS)
            || value.eq_ignore_ascii_case("todas")
        {
            Self::All
        } else {
            Self::Only(value.to_string())
        }
    }

    fn matches(&self, unit: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == unit,
        }
    }
}

/// Search/filter criteria. The default filter matches every record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecordFilter {
    /// Case-insensitive substring; blank matches everything
    pub text: String,
    pub unit: UnitFilter,
    /// Inclusive lower bound
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound
    pub date_to: Option<NaiveDate>,
}

impl RecordFilter {
    /// Whether a record satisfies every criterion.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        self.matches_text(record)
            && self.unit.matches(&record.unit)
            && self.date_from.is_none_or(|from| record.date >= from)
            && self.date_to.is_none_or(|to| record.date <= to)
    }

    fn matches_text(&self, record: &Record) -> bool {
        let needle = self.text.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        let haystack = [
            record.activity.as_deref().unwrap_or(""),
            record.interaction.as_deref().unwrap_or(""),
            &record.counterparties.join(", "),
            record.notes.as_deref().unwrap_or(""),
        ]
        .join(" ")
        .to_lowercase();

        haystack.contains(&needle)
    }
}

/// Records matching `filter`, in their original order.
pub fn filter_records<'a>(records: &'a [Record], filter: &RecordFilter) -> Vec<&'a Record> {
    records.iter().filter(|record| filter.matches(record)).collect()
}

/// Midpoint estimate, in minutes, for a duration label.
///
/// Unknown labels and "Outro (especificar)" count as zero.
#[must_use]
pub fn duration_minutes(label: &str) -> u32 {
    match label {
        "Até 5 min" => 5,
        "5 a 15 min" => 10,
        "15 a 30 min" => 22,
        "30 a 45 min" => 37,
        "45 a 60 min" => 52,
        "60 a 90 min" => 75,
        "Mais de 90 min" => 105,
        "Mais de 120 min" => 135,
        "Mais de 180 min" => 195,
        _ => 0,
    }
}

/// Aggregate view over a set of records
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub estimated_minutes: u32,
    /// Group label and record count, in first-seen order
    pub counts_by_group: Vec<(String, usize)>,
}

impl Summary {
    /// Estimated time in hours, rounded to one decimal
    #[must_use]
    pub fn estimated_hours(&self) -> f64 {
        (f64::from(self.estimated_minutes) / 60.0 * 10.0).round() / 10.0
    }
}

/// Count records, estimate their total time and group them by
/// activity (or `(via <interaction>)`).
pub fn summarize<'a>(records: impl IntoIterator<Item = &'a Record>) -> Summary {
    let mut summary = Summary::default();

    for record in records {
        summary.count += 1;
        summary.estimated_minutes += duration_minutes(&record.duration);

        let label = record.group_label();
        if let Some((_, count)) = summary
            .counts_by_group
            .iter_mut()
            .find(|(existing, _)| *existing == label)
        {
            *count += 1;
        } else {
            summary.counts_by_group.push((label, 1));
        }
    }

    summary
}
