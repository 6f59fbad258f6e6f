//! Taxonomy model: the configurable pick-lists used to classify records

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ImportError};

const DEFAULT_UNITS: &[&str] = &["CJ", "NLC"];

const DEFAULT_ACTIVITIES: &[&str] = &[
    "Interação Whatsapp",
    "Interação Email",
    "Interação Telefone",
    "Reunião interna do órgão",
    "Reunião externa",
    "Estudos temáticos",
    "Participação em Comitê ou Comissão",
    "CIACON",
    "CEAI",
    "CGGDIESP",
    "CONEXÕES - GERAL",
    "CONEXÕES - COORD",
];

const DEFAULT_INTERACTIONS: &[&str] = &[
    "Parecer",
    "Cota",
    "Despacho",
    "Nota Técnica",
    "Informações em MS",
    "Outras minutas",
];

const DEFAULT_COUNTERPARTIES: &[&str] = &[
    "Colegas CJ",
    "Expediente CJ",
    "Sub Consultoria",
    "SubConsultoria_grupo_NLC",
    "Julio",
    "UGP_SP_Mais_Digital",
    "Fenili",
    "Andrea",
    "Equipes_Fenili&Andrea",
    "Gabinete SGGD",
    "Outros",
    "ColegasOutrasUnidades",
    "Joao - Sub Gov Digital",
    "Equipe do Joao - Sub Gov Digital",
    "Eva - Sub Gestão de Pessoas",
    "Equipe da Eva - Sub Gestão de Pessoas",
    "AJG",
    "Elaine - Ouvidora PGE",
    "Paulo - Sub Patrimônio",
    "Equipe do Paulo - Sub Patrimônio",
];

const DEFAULT_DURATIONS: &[&str] = &[
    "Até 5 min",
    "5 a 15 min",
    "15 a 30 min",
    "30 a 45 min",
    "45 a 60 min",
    "60 a 90 min",
    "Mais de 90 min",
    "Mais de 120 min",
    "Mais de 180 min",
    "Outro (especificar)",
];

/// The fixed set of taxonomy keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Units,
    Activities,
    Interactions,
    Counterparties,
    Durations,
}

impl Category {
    pub const ALL: [Self; 5] = [
        Self::Units,
        Self::Activities,
        Self::Interactions,
        Self::Counterparties,
        Self::Durations,
    ];

    /// Key used in the serialized taxonomy object
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Units => "UNITS",
            Self::Activities => "ACTIVITIES",
            Self::Interactions => "INTERACTIONS",
            Self::Counterparties => "COUNTERPARTIES",
            Self::Durations => "DURATIONS",
        }
    }

    const fn legacy_keys(self) -> &'static [&'static str] {
        match self {
            Self::Units => &["UNIDADES"],
            Self::Activities => &["ATIVIDADES"],
            Self::Interactions => &["INTERACOES", "MANIFESTAÇÕES"],
            Self::Counterparties => &["COM_QUEM"],
            Self::Durations => &[],
        }
    }

    fn defaults(self) -> Vec<String> {
        let values = match self {
            Self::Units => DEFAULT_UNITS,
            Self::Activities => DEFAULT_ACTIVITIES,
            Self::Interactions => DEFAULT_INTERACTIONS,
            Self::Counterparties => DEFAULT_COUNTERPARTIES,
            Self::Durations => DEFAULT_DURATIONS,
        };
        values.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = Error;

    /// Accepts canonical keys in any case, with `-` for `_`, plus legacy keys.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_").to_uppercase();
        Self::ALL
            .into_iter()
            .find(|category| {
                category.key() == normalized || category.legacy_keys().contains(&normalized.as_str())
            })
            .ok_or_else(|| Error::InvalidInput(format!("Unknown taxonomy category: {}", s.trim())))
    }
}

/// Option lists for every category.
///
/// Deserializing always starts from the built-in defaults: a category present
/// in the input replaces its default list wholesale, a missing one keeps the
/// default, and unknown keys are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "TaxonomyOverrides")]
pub struct Taxonomy {
    pub units: Vec<String>,
    pub activities: Vec<String>,
    pub interactions: Vec<String>,
    pub counterparties: Vec<String>,
    pub durations: Vec<String>,
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self {
            units: Category::Units.defaults(),
            activities: Category::Activities.defaults(),
            interactions: Category::Interactions.defaults(),
            counterparties: Category::Counterparties.defaults(),
            durations: Category::Durations.defaults(),
        }
    }
}

impl Taxonomy {
    /// Labels configured for `category`, in display order
    #[must_use]
    pub fn values(&self, category: Category) -> &[String] {
        match category {
            Category::Units => &self.units,
            Category::Activities => &self.activities,
            Category::Interactions => &self.interactions,
            Category::Counterparties => &self.counterparties,
            Category::Durations => &self.durations,
        }
    }

    fn values_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Units => &mut self.units,
            Category::Activities => &mut self.activities,
            Category::Interactions => &mut self.interactions,
            Category::Counterparties => &mut self.counterparties,
            Category::Durations => &mut self.durations,
        }
    }

    /// Append a trimmed value unless it is blank or already present.
    ///
    /// Returns `true` when the list changed.
    pub fn add(&mut self, category: Category, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }

        let values = self.values_mut(category);
        if values.iter().any(|existing| existing == value) {
            return false;
        }
        values.push(value.to_string());
        true
    }

    /// Remove every exact match of `value`.
    ///
    /// Returns `true` when the list changed.
    pub fn remove(&mut self, category: Category, value: &str) -> bool {
        let values = self.values_mut(category);
        let before = values.len();
        values.retain(|existing| existing != value);
        values.len() != before
    }

    /// Parse an external taxonomy document and merge it over the defaults.
    pub fn from_json(raw: &str) -> Result<Self, ImportError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        if !value.is_object() {
            return Err(ImportError::Structure(
                "taxonomy must be a JSON object keyed by category".to_string(),
            ));
        }
        serde_json::from_value(value).map_err(|error| ImportError::Structure(error.to_string()))
    }

    /// Pretty-printed JSON object keyed by category
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct TaxonomyOverrides {
    #[serde(default, alias = "UNIDADES")]
    units: Option<Vec<String>>,
    #[serde(default, alias = "ATIVIDADES")]
    activities: Option<Vec<String>>,
    #[serde(default, alias = "INTERACOES", alias = "MANIFESTAÇÕES")]
    interactions: Option<Vec<String>>,
    #[serde(default, alias = "COM_QUEM")]
    counterparties: Option<Vec<String>>,
    #[serde(default)]
    durations: Option<Vec<String>>,
}

impl From<TaxonomyOverrides> for Taxonomy {
    fn from(overrides: TaxonomyOverrides) -> Self {
        let defaults = Self::default();
        let merge = |values: Option<Vec<String>>, fallback: Vec<String>| {
            values.map_or(fallback, dedup_keep_first)
        };
        Self {
            units: merge(overrides.units, defaults.units),
            activities: merge(overrides.activities, defaults.activities),
            interactions: merge(overrides.interactions, defaults.interactions),
            counterparties: merge(overrides.counterparties, defaults.counterparties),
            durations: merge(overrides.durations, defaults.durations),
        }
    }
}

fn dedup_keep_first(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}
