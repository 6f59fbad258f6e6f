//! Persistence gateway: the two storage slots used by the app

use crate::db::KeyValueStore;
use crate::error::Result;
use crate::models::{Record, Taxonomy};
use serde::Serialize;

/// Slot holding the JSON array of records
pub const RECORDS_KEY: &str = "racEntries_v3";

/// Slot holding the JSON taxonomy object
pub const TAXONOMY_KEY: &str = "racOptions_v3";

/// Contents of the record slot.
///
/// Elements that fail to deserialize are carried along so a later save
/// writes them back instead of dropping them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredRecords {
    pub records: Vec<Record>,
    pub unreadable: Vec<serde_json::Value>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum SlotElement<'a> {
    Record(&'a Record),
    Raw(&'a serde_json::Value),
}

/// Loads and saves the record collection and the taxonomy.
///
/// Loads never fail: a missing or corrupt slot degrades to an empty
/// collection or the default taxonomy. Saves always overwrite the full slot.
pub struct PersistenceGateway<S> {
    store: S,
}

impl<S: KeyValueStore> PersistenceGateway<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Load every stored record, in stored order.
    ///
    /// Elements that no longer deserialize are left out; use
    /// [`Self::load_stored_records`] to keep them.
    pub fn load_records(&self) -> Vec<Record> {
        self.load_stored_records().records
    }

    /// Load the record slot, keeping unreadable elements verbatim.
    pub fn load_stored_records(&self) -> StoredRecords {
        let Some(raw) = self.read_slot(RECORDS_KEY) else {
            return StoredRecords::default();
        };

        let elements = match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
            Ok(elements) => elements,
            Err(error) => {
                tracing::warn!("Ignoring unreadable record slot: {error}");
                return StoredRecords::default();
            }
        };

        let mut stored = StoredRecords::default();
        for element in elements {
            match serde_json::from_value::<Record>(element.clone()) {
                Ok(record) => stored.records.push(record),
                Err(error) => {
                    tracing::warn!("Keeping unreadable stored record as-is: {error}");
                    stored.unreadable.push(element);
                }
            }
        }

        tracing::debug!(
            "Loaded {} records ({} unreadable)",
            stored.records.len(),
            stored.unreadable.len()
        );
        stored
    }

    /// Overwrite the record slot with the full collection.
    pub fn save_records(&self, records: &[Record]) -> Result<()> {
        self.save_stored_records(records, &[])
    }

    /// Overwrite the record slot, writing `unreadable` back after `records`.
    pub fn save_stored_records(
        &self,
        records: &[Record],
        unreadable: &[serde_json::Value],
    ) -> Result<()> {
        let elements = records
            .iter()
            .map(SlotElement::Record)
            .chain(unreadable.iter().map(SlotElement::Raw))
            .collect::<Vec<_>>();
        let raw = serde_json::to_string(&elements)?;
        self.store.set(RECORDS_KEY, &raw)?;
        tracing::debug!(
            "Saved {} records ({} kept unreadable)",
            records.len(),
            unreadable.len()
        );
        Ok(())
    }

    /// Load the taxonomy merged over the defaults.
    pub fn load_taxonomy(&self) -> Taxonomy {
        let Some(raw) = self.read_slot(TAXONOMY_KEY) else {
            return Taxonomy::default();
        };

        Taxonomy::from_json(&raw).unwrap_or_else(|error| {
            tracing::warn!("Ignoring unreadable taxonomy slot: {error}");
            Taxonomy::default()
        })
    }

    /// Overwrite the taxonomy slot.
    pub fn save_taxonomy(&self, taxonomy: &Taxonomy) -> Result<()> {
        let raw = serde_json::to_string(taxonomy)?;
        self.store.set(TAXONOMY_KEY, &raw)?;
        Ok(())
    }

    fn read_slot(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!("Failed to read storage slot '{key}': {error}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, MemoryKeyValueStore, SqliteKeyValueStore};
    use crate::models::{Category, Difficulty, RecordId};
    use chrono::{NaiveDate, NaiveTime};
    use pretty_assertions::assert_eq;

    fn record(id: &str) -> Record {
        Record {
            id: id.parse::<RecordId>().unwrap(),
            unit: "CJ".to_string(),
            activity: Some("CEAI".to_string()),
            interaction: None,
            counterparties: Vec::new(),
            duration: "5 a 15 min".to_string(),
            difficulty: Difficulty::Unset,
            urgent: false,
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            notes: None,
            voice_note: None,
        }
    }

    #[test]
    fn test_missing_slots_use_defaults() {
        let gateway = PersistenceGateway::new(MemoryKeyValueStore::new());

        assert!(gateway.load_records().is_empty());
        assert_eq!(gateway.load_taxonomy(), Taxonomy::default());
    }

    #[test]
    fn test_records_round_trip_through_sqlite() {
        let db = Database::open_in_memory().unwrap();
        let gateway = PersistenceGateway::new(SqliteKeyValueStore::new(db.connection()));
        let records = vec![record("a"), record("b")];

        gateway.save_records(&records).unwrap();
        assert_eq!(gateway.load_records(), records);

        gateway.save_records(&records[1..]).unwrap();
        assert_eq!(gateway.load_records(), vec![record("b")]);
    }

    #[test]
    fn test_corrupt_record_slot_is_swallowed() {
        let gateway = PersistenceGateway::new(MemoryKeyValueStore::new());

        gateway.store().set(RECORDS_KEY, "{ broken").unwrap();
        assert!(gateway.load_records().is_empty());

        gateway.store().set(RECORDS_KEY, r#"{"id": "x"}"#).unwrap();
        assert!(gateway.load_records().is_empty());
    }

    #[test]
    fn test_unreadable_elements_are_kept_aside() {
        let gateway = PersistenceGateway::new(MemoryKeyValueStore::new());
        let good = serde_json::to_value(record("good")).unwrap();
        let bad = serde_json::json!({ "id": "bad", "hora": "nine" });
        let raw = serde_json::json!([bad, good]).to_string();

        gateway.store().set(RECORDS_KEY, &raw).unwrap();
        assert_eq!(gateway.load_records(), vec![record("good")]);

        let stored = gateway.load_stored_records();
        assert_eq!(stored.records, vec![record("good")]);
        assert_eq!(stored.unreadable, vec![bad.clone()]);

        gateway
            .save_stored_records(&[record("new"), record("good")], &stored.unreadable)
            .unwrap();
        let reloaded = gateway.load_stored_records();
        assert_eq!(reloaded.records, vec![record("new"), record("good")]);
        assert_eq!(reloaded.unreadable, vec![bad]);
    }

    #[test]
    fn test_legacy_null_fields_load_and_survive_a_save() {
        let gateway = PersistenceGateway::new(MemoryKeyValueStore::new());
        let raw = r#"[{
            "id": "legacy", "unidade": "CJ", "atividade": "", "interacao": "Parecer",
            "comQuem": null, "duracao": "Até 5 min", "dificuldade": "",
            "urgente": false, "data": "2024-01-02", "hora": "09:00"
        }]"#;
        gateway.store().set(RECORDS_KEY, raw).unwrap();

        let loaded = gateway.load_stored_records();
        assert_eq!(loaded.records.len(), 1);
        assert!(loaded.unreadable.is_empty());
        assert!(loaded.records[0].counterparties.is_empty());

        gateway.save_records(&loaded.records).unwrap();
        assert_eq!(gateway.load_records(), loaded.records);
    }

    #[test]
    fn test_taxonomy_round_trip_and_corruption() {
        let gateway = PersistenceGateway::new(MemoryKeyValueStore::new());
        let mut taxonomy = Taxonomy::default();
        taxonomy.add(Category::Units, "PGE");

        gateway.save_taxonomy(&taxonomy).unwrap();
        assert_eq!(gateway.load_taxonomy(), taxonomy);

        gateway.store().set(TAXONOMY_KEY, "not json").unwrap();
        assert_eq!(gateway.load_taxonomy(), Taxonomy::default());
    }

    #[test]
    fn test_persisted_categories_replace_defaults() {
        let gateway = PersistenceGateway::new(MemoryKeyValueStore::new());
        gateway
            .store()
            .set(TAXONOMY_KEY, r#"{"UNITS": ["Only"]}"#)
            .unwrap();

        let taxonomy = gateway.load_taxonomy();
        assert_eq!(taxonomy.units, vec!["Only"]);
        assert_eq!(taxonomy.durations, Taxonomy::default().durations);
    }
}
