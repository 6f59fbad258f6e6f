//! Record drafts and the validator that turns them into records.
//!
//! A draft tracks the activity/interaction exclusivity as an explicit state
//! machine, so the "only one of the two" rule cannot be violated while the
//! user edits and is checked once more by [`RecordDraft::accept`].

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::ValidationError;
use crate::models::{Difficulty, Record, RecordId, Taxonomy, VoiceNote};
use crate::util::normalize_text_option;

/// Maximum number of counterparties a record can carry.
pub const MAX_COUNTERPARTIES: usize = 3;

/// Which half of the exclusivity pair is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Classification {
    /// Nothing chosen yet
    #[default]
    Neither,
    /// An activity; counterparties do not apply
    Activity(String),
    /// An interaction and who it was with
    Interaction {
        interaction: String,
        counterparties: Vec<String>,
    },
}

/// A record being created or edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDraft {
    id: Option<RecordId>,
    classification: Classification,
    pub unit: String,
    pub duration: String,
    pub difficulty: Difficulty,
    pub urgent: bool,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub notes: Option<String>,
    pub voice_note: Option<VoiceNote>,
}

impl RecordDraft {
    /// Fresh draft seeded from the taxonomy and the current local time.
    #[must_use]
    pub fn new(taxonomy: &Taxonomy) -> Self {
        Self::new_at(taxonomy, Local::now().naive_local())
    }

    /// Fresh draft seeded from the taxonomy and an explicit timestamp.
    ///
    /// Unit and duration default to the first configured label.
    #[must_use]
    pub fn new_at(taxonomy: &Taxonomy, now: NaiveDateTime) -> Self {
        Self {
            id: None,
            classification: Classification::Neither,
            unit: taxonomy.units.first().cloned().unwrap_or_default(),
            duration: taxonomy.durations.first().cloned().unwrap_or_default(),
            difficulty: Difficulty::Unset,
            urgent: false,
            date: now.date(),
            time: truncate_to_minute(now.time()),
            notes: None,
            voice_note: None,
        }
    }

    /// Reopen an existing record for editing, keeping its id.
    #[must_use]
    pub fn from_record(record: &Record) -> Self {
        let classification = if let Some(activity) = record.activity() {
            Classification::Activity(activity.to_string())
        } else if let Some(interaction) = record.interaction() {
            Classification::Interaction {
                interaction: interaction.to_string(),
                counterparties: record
                    .counterparties
                    .iter()
                    .take(MAX_COUNTERPARTIES)
                    .cloned()
                    .collect(),
            }
        } else {
            Classification::Neither
        };

        Self {
            id: Some(record.id.clone()),
            classification,
            unit: record.unit.clone(),
            duration: record.duration.clone(),
            difficulty: record.difficulty,
            urgent: record.urgent,
            date: record.date,
            time: record.time,
            notes: record.notes.clone(),
            voice_note: record.voice_note.clone(),
        }
    }

    /// Id of the record being edited, `None` for new records
    #[must_use]
    pub const fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    #[must_use]
    pub const fn classification(&self) -> &Classification {
        &self.classification
    }

    #[must_use]
    pub fn counterparties(&self) -> &[String] {
        match &self.classification {
            Classification::Interaction { counterparties, .. } => counterparties,
            _ => &[],
        }
    }

    /// Choose an activity, clearing any interaction and its counterparties.
    ///
    /// A blank value only clears a previously chosen activity.
    pub fn set_activity(&mut self, activity: &str) {
        let activity = activity.trim();
        if activity.is_empty() {
            if matches!(self.classification, Classification::Activity(_)) {
                self.classification = Classification::Neither;
            }
            return;
        }
        self.classification = Classification::Activity(activity.to_string());
    }

    /// Choose an interaction, clearing any activity.
    ///
    /// Counterparties already picked for a previous interaction are kept.
    /// A blank value only clears a previously chosen interaction.
    pub fn set_interaction(&mut self, interaction: &str) {
        let interaction = interaction.trim();
        if interaction.is_empty() {
            if matches!(self.classification, Classification::Interaction { .. }) {
                self.classification = Classification::Neither;
            }
            return;
        }

        let counterparties = match std::mem::take(&mut self.classification) {
            Classification::Interaction { counterparties, .. } => counterparties,
            _ => Vec::new(),
        };
        self.classification = Classification::Interaction {
            interaction: interaction.to_string(),
            counterparties,
        };
    }

    /// Add one counterparty to the current interaction.
    ///
    /// Returns `false` when nothing changed: no interaction is chosen, the
    /// value is blank or already selected, or the cap is already reached.
    pub fn select_counterparty(&mut self, counterparty: &str) -> bool {
        let Classification::Interaction { counterparties, .. } = &mut self.classification else {
            return false;
        };
        let counterparty = counterparty.trim();
        if counterparty.is_empty()
            || counterparties.len() >= MAX_COUNTERPARTIES
            || counterparties.iter().any(|existing| existing == counterparty)
        {
            return false;
        }
        counterparties.push(counterparty.to_string());
        true
    }

    /// Remove a counterparty from the current interaction.
    pub fn deselect_counterparty(&mut self, counterparty: &str) -> bool {
        let Classification::Interaction { counterparties, .. } = &mut self.classification else {
            return false;
        };
        let before = counterparties.len();
        counterparties.retain(|existing| existing != counterparty);
        counterparties.len() != before
    }

    /// Replace the whole selection; anything past the third entry is dropped.
    pub fn set_counterparties<I, S>(&mut self, selection: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if let Classification::Interaction { counterparties, .. } = &mut self.classification {
            counterparties.clear();
        }
        for counterparty in selection {
            self.select_counterparty(counterparty.as_ref());
        }
    }

    /// Validate the draft and build the finished record.
    ///
    /// Edits keep their id; new drafts get a fresh one.
    pub fn accept(&self) -> Result<Record, ValidationError> {
        let (activity, interaction, counterparties) = match &self.classification {
            Classification::Neither => return Err(ValidationError::MissingClassification),
            Classification::Activity(activity) => (Some(activity.clone()), None, Vec::new()),
            Classification::Interaction { counterparties, .. } if counterparties.is_empty() => {
                return Err(ValidationError::MissingCounterparties)
            }
            Classification::Interaction {
                interaction,
                counterparties,
            } => (
                None,
                Some(interaction.clone()),
                counterparties
                    .iter()
                    .take(MAX_COUNTERPARTIES)
                    .cloned()
                    .collect(),
            ),
        };

        Ok(Record {
            id: self.id.clone().unwrap_or_default(),
            unit: self.unit.clone(),
            activity,
            interaction,
            counterparties,
            duration: self.duration.clone(),
            difficulty: self.difficulty,
            urgent: self.urgent,
            date: self.date,
            time: truncate_to_minute(self.time),
            notes: normalize_text_option(self.notes.clone()),
            voice_note: self.voice_note.clone(),
        })
    }
}

/// Validate a draft and build its record (collaborator-facing entry point).
pub fn validate_and_build_record(draft: &RecordDraft) -> Result<Record, ValidationError> {
    draft.accept()
}

fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}
