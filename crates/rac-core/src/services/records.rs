//! The owned record collection and its mutations.

use crate::db::{KeyValueStore, PersistenceGateway, StoredRecords};
use crate::error::{Error, Result};
use crate::export::{parse_json_backup, render_csv_export, render_json_backup};
use crate::models::{Record, RecordDraft, RecordId};
use crate::search::{filter_records, summarize, RecordFilter, Summary};

/// What an upsert did to the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new record was placed at the front
    Created,
    /// An existing record was replaced in place
    Updated,
}

/// In-memory record collection backed by a [`PersistenceGateway`].
///
/// Records are kept newest first. Every mutation rewrites the whole slot
/// before the in-memory collection changes, so a failed save leaves both
/// sides as they were. Stored elements that do not deserialize are written
/// back untouched until a backup import replaces the collection.
pub struct RecordService<S> {
    gateway: PersistenceGateway<S>,
    records: Vec<Record>,
    unreadable: Vec<serde_json::Value>,
}

impl<S: KeyValueStore> RecordService<S> {
    /// Load the collection from `store`.
    pub fn open(store: S) -> Self {
        let gateway = PersistenceGateway::new(store);
        let StoredRecords {
            records,
            unreadable,
        } = gateway.load_stored_records();
        Self {
            gateway,
            records,
            unreadable,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of stored elements that could not be read as records
    pub fn unreadable_count(&self) -> usize {
        self.unreadable.len()
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|record| &record.id == id)
    }

    /// Insert a new record at the front, or replace the one sharing its id.
    pub fn upsert(&mut self, record: Record) -> Result<UpsertOutcome> {
        let mut next = self.records.clone();
        let outcome = match next.iter().position(|existing| existing.id == record.id) {
            Some(index) => {
                next[index] = record;
                UpsertOutcome::Updated
            }
            None => {
                next.insert(0, record);
                UpsertOutcome::Created
            }
        };

        self.commit(next)?;
        Ok(outcome)
    }

    /// Validate a draft and upsert the resulting record.
    pub fn submit(&mut self, draft: &RecordDraft) -> Result<Record> {
        let record = draft.accept()?;
        let outcome = self.upsert(record.clone())?;
        tracing::debug!("Submitted record {} ({outcome:?})", record.id);
        Ok(record)
    }

    /// Remove a record by id and return it.
    pub fn delete(&mut self, id: &RecordId) -> Result<Record> {
        let index = self
            .records
            .iter()
            .position(|record| &record.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        let mut next = self.records.clone();
        let removed = next.remove(index);
        self.commit(next)?;
        Ok(removed)
    }

    /// Replace the whole collection with a JSON backup.
    ///
    /// Nothing changes unless the entire document is valid.
    pub fn import_backup(&mut self, raw: &str) -> Result<usize> {
        let imported = parse_json_backup(raw)?;
        let count = imported.len();
        self.gateway.save_records(&imported)?;
        if !self.unreadable.is_empty() {
            tracing::warn!(
                "Backup import replaced {} unreadable stored records",
                self.unreadable.len()
            );
        }
        self.records = imported;
        self.unreadable.clear();
        tracing::info!("Imported {count} records from backup");
        Ok(count)
    }

    /// Every record as a pretty-printed JSON backup
    pub fn export_backup(&self) -> Result<String> {
        Ok(render_json_backup(&self.records)?)
    }

    /// Records matching `filter`, in collection order
    pub fn filter(&self, filter: &RecordFilter) -> Vec<&Record> {
        filter_records(&self.records, filter)
    }

    /// CSV of the records matching `filter`
    pub fn export_csv(&self, filter: &RecordFilter) -> String {
        render_csv_export(self.filter(filter))
    }

    /// Summary of the records matching `filter`
    pub fn summarize(&self, filter: &RecordFilter) -> Summary {
        summarize(self.filter(filter))
    }

    fn commit(&mut self, records: Vec<Record>) -> Result<()> {
        self.gateway.save_stored_records(&records, &self.unreadable)?;
        self.records = records;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, MemoryKeyValueStore, SqliteKeyValueStore, RECORDS_KEY};
    use crate::error::{ImportError, ValidationError};
    use crate::models::Taxonomy;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn draft_with_activity(activity: &str) -> RecordDraft {
        let now = NaiveDate::from_ymd_opt(2024, 5, 20)
            .unwrap()
            .and_hms_opt(14, 5, 33)
            .unwrap();
        let mut draft = RecordDraft::new_at(&Taxonomy::default(), now);
        draft.set_activity(activity);
        draft
    }

    fn activities<S: KeyValueStore>(service: &RecordService<S>) -> Vec<&str> {
        service
            .records()
            .iter()
            .filter_map(Record::activity)
            .collect()
    }

    #[test]
    fn test_submit_inserts_newest_first_and_persists() {
        let store = MemoryKeyValueStore::new();
        let mut service = RecordService::open(&store);

        service.submit(&draft_with_activity("CEAI")).unwrap();
        service.submit(&draft_with_activity("Cota")).unwrap();
        assert_eq!(activities(&service), vec!["Cota", "CEAI"]);

        let reopened = RecordService::open(&store);
        assert_eq!(reopened.records(), service.records());
    }

    #[test]
    fn test_submit_rejects_invalid_drafts() {
        let mut service = RecordService::open(MemoryKeyValueStore::new());
        let draft = RecordDraft::new(&Taxonomy::default());

        let error = service.submit(&draft).unwrap_err();
        assert!(matches!(
            error,
            Error::Validation(ValidationError::MissingClassification)
        ));
        assert!(service.records().is_empty());
    }

    #[test]
    fn test_edit_replaces_in_place() {
        let mut service = RecordService::open(MemoryKeyValueStore::new());
        let first = service.submit(&draft_with_activity("CEAI")).unwrap();
        service.submit(&draft_with_activity("Cota")).unwrap();

        let mut draft = RecordDraft::from_record(&first);
        draft.set_interaction("Parecer");
        assert!(draft.select_counterparty("Julio"));
        let edited = service.submit(&draft).unwrap();

        assert_eq!(edited.id, first.id);
        assert_eq!(service.records().len(), 2);
        assert_eq!(service.records()[1].interaction(), Some("Parecer"));
        assert_eq!(service.records()[1].activity(), None);
        assert_eq!(
            service.upsert(edited).unwrap(),
            UpsertOutcome::Updated
        );
    }

    #[test]
    fn test_delete() {
        let store = MemoryKeyValueStore::new();
        let mut service = RecordService::open(&store);
        let record = service.submit(&draft_with_activity("CEAI")).unwrap();

        let removed = service.delete(&record.id).unwrap();
        assert_eq!(removed, record);
        assert!(service.get(&record.id).is_none());
        assert!(RecordService::open(&store).records().is_empty());

        let error = service.delete(&record.id).unwrap_err();
        assert!(matches!(error, Error::NotFound(_)));
    }

    #[test]
    fn test_import_backup_replaces_collection() {
        let mut source = RecordService::open(MemoryKeyValueStore::new());
        source.submit(&draft_with_activity("CEAI")).unwrap();
        source.submit(&draft_with_activity("Cota")).unwrap();
        let backup = source.export_backup().unwrap();

        let mut target = RecordService::open(MemoryKeyValueStore::new());
        target.submit(&draft_with_activity("Outro")).unwrap();

        assert_eq!(target.import_backup(&backup).unwrap(), 2);
        assert_eq!(target.records(), source.records());
    }

    #[test]
    fn test_failed_import_keeps_prior_state() {
        let store = MemoryKeyValueStore::new();
        let mut service = RecordService::open(&store);
        service.submit(&draft_with_activity("CEAI")).unwrap();
        let before = store.get(RECORDS_KEY).unwrap();

        let error = service.import_backup(r#"{"not": "an array"}"#).unwrap_err();
        assert!(matches!(error, Error::Import(ImportError::Structure(_))));
        assert_eq!(activities(&service), vec!["CEAI"]);
        assert_eq!(store.get(RECORDS_KEY).unwrap(), before);
    }

    #[test]
    fn test_legacy_and_unreadable_records_survive_mutations() {
        let store = MemoryKeyValueStore::new();
        let legacy = r#"{"id": "legacy", "unidade": "CJ", "interacao": "Parecer",
            "comQuem": null, "duracao": "Até 5 min", "data": "2024-01-02", "hora": "09:00"}"#;
        let broken = r#"{"id": "broken", "data": "someday"}"#;
        store
            .set(RECORDS_KEY, &format!("[{legacy}, {broken}]"))
            .unwrap();

        let mut service = RecordService::open(&store);
        assert_eq!(service.records().len(), 1);
        assert_eq!(service.unreadable_count(), 1);
        service.submit(&draft_with_activity("CEAI")).unwrap();

        let reopened = RecordService::open(&store);
        let ids = reopened
            .records()
            .iter()
            .map(|record| record.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[1], "legacy");
        assert_eq!(reopened.unreadable_count(), 1);
        let raw = store.get(RECORDS_KEY).unwrap().unwrap();
        assert!(raw.contains(r#""id":"broken""#));
    }

    #[test]
    fn test_import_backup_accepts_legacy_nulls_and_drops_unreadable() {
        let store = MemoryKeyValueStore::new();
        store
            .set(RECORDS_KEY, r#"[{"id": "broken", "data": "someday"}]"#)
            .unwrap();
        let mut service = RecordService::open(&store);
        assert_eq!(service.unreadable_count(), 1);

        let backup = r#"[{"id": "legacy", "interacao": "Parecer", "comQuem": null,
            "urgente": null, "data": "2024-01-02", "hora": "09:00"}]"#;
        assert_eq!(service.import_backup(backup).unwrap(), 1);
        assert_eq!(service.unreadable_count(), 0);

        let reopened = RecordService::open(&store);
        assert_eq!(reopened.records().len(), 1);
        assert_eq!(reopened.unreadable_count(), 0);
        assert!(reopened.records()[0].counterparties.is_empty());
    }

    #[test]
    fn test_filtered_exports_and_summary() {
        let db = Database::open_in_memory().unwrap();
        let mut service = RecordService::open(SqliteKeyValueStore::new(db.connection()));
        service.submit(&draft_with_activity("CEAI")).unwrap();
        service.submit(&draft_with_activity("Cota")).unwrap();

        let filter = RecordFilter {
            text: "cota".to_string(),
            ..RecordFilter::default()
        };
        let csv = service.export_csv(&filter);
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.contains(",Cota,"));

        let summary = service.summarize(&RecordFilter::default());
        assert_eq!(summary.count, 2);
        assert_eq!(summary.estimated_minutes, 10);
    }
}
