//! Record model

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::Error;

/// An opaque, collection-unique record identifier.
///
/// New ids are UUID v7 strings, but ids read back from storage or a backup are
/// kept verbatim so that any existing identifier survives a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Create a new unique record ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RecordId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidInput("Record ID cannot be empty".into()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

/// Perceived difficulty of a logged event.
///
/// The serialized form is the Portuguese label shown to the user; `Unset`
/// is the empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "Baixa")]
    Low,
    #[serde(rename = "Média")]
    Medium,
    #[serde(rename = "Alta")]
    High,
    #[serde(rename = "Altíssima")]
    VeryHigh,
    #[default]
    #[serde(rename = "")]
    Unset,
}

impl Difficulty {
    /// All variants in display order.
    pub const ALL: [Self; 5] = [
        Self::Low,
        Self::Medium,
        Self::High,
        Self::VeryHigh,
        Self::Unset,
    ];

    /// User-facing label, empty for `Unset`
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Baixa",
            Self::Medium => "Média",
            Self::High => "Alta",
            Self::VeryHigh => "Altíssima",
            Self::Unset => "",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| Error::InvalidInput(format!("Unknown difficulty: {trimmed}")))
    }
}

/// Reference to a recorded audio note.
///
/// The core never decodes it; clients typically store a `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoiceNote(String);

impl VoiceNote {
    #[must_use]
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A single logged work event.
///
/// Optional text fields keep the difference between "absent" and "empty"
/// so a JSON backup reproduces exactly what was stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,
    #[serde(default, alias = "unidade", deserialize_with = "null_as_default")]
    pub unit: String,
    #[serde(default, alias = "atividade", skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    #[serde(default, alias = "interacao", skip_serializing_if = "Option::is_none")]
    pub interaction: Option<String>,
    /// At most three entries, only meaningful alongside an interaction
    #[serde(default, alias = "comQuem", deserialize_with = "null_as_default")]
    pub counterparties: Vec<String>,
    #[serde(default, alias = "duracao", deserialize_with = "null_as_default")]
    pub duration: String,
    #[serde(default, alias = "dificuldade", deserialize_with = "null_as_default")]
    pub difficulty: Difficulty,
    #[serde(default, alias = "urgente", deserialize_with = "null_as_default")]
    pub urgent: bool,
    #[serde(alias = "data")]
    pub date: NaiveDate,
    #[serde(alias = "hora", with = "hhmm")]
    pub time: NaiveTime,
    #[serde(default, alias = "observacoes", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(
        default,
        alias = "observacoesAudio",
        skip_serializing_if = "Option::is_none"
    )]
    pub voice_note: Option<VoiceNote>,
}

impl Record {
    /// The activity, if set to a non-empty value
    #[must_use]
    pub fn activity(&self) -> Option<&str> {
        non_empty(self.activity.as_deref())
    }

    /// The interaction, if set to a non-empty value
    #[must_use]
    pub fn interaction(&self) -> Option<&str> {
        non_empty(self.interaction.as_deref())
    }

    /// Activity or interaction, whichever classifies this record
    #[must_use]
    pub fn classification(&self) -> &str {
        self.activity().or_else(|| self.interaction()).unwrap_or("")
    }

    /// Label used when grouping records in a summary.
    ///
    /// Interaction-only records are grouped as `(via <interaction>)`.
    #[must_use]
    pub fn group_label(&self) -> String {
        self.activity().map_or_else(
            || format!("(via {})", self.interaction.as_deref().unwrap_or("")),
            ToString::to_string,
        )
    }

    /// Time formatted as `HH:MM`
    #[must_use]
    pub fn time_label(&self) -> String {
        self.time.format(hhmm::FORMAT).to_string()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

/// Older entries carry explicit `null`s where a value is expected.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `HH:MM` (24h) serde representation for times of day.
pub(crate) mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
