//! Taxonomy store: the option lists and their persistence.

use crate::db::{KeyValueStore, PersistenceGateway};
use crate::error::Result;
use crate::models::{Category, Taxonomy};

/// The current taxonomy, saved after every change.
pub struct TaxonomyStore<S> {
    gateway: PersistenceGateway<S>,
    taxonomy: Taxonomy,
}

impl<S: KeyValueStore> TaxonomyStore<S> {
    /// Load the persisted taxonomy merged over the defaults.
    pub fn load(store: S) -> Self {
        let gateway = PersistenceGateway::new(store);
        let taxonomy = gateway.load_taxonomy();
        Self { gateway, taxonomy }
    }

    pub const fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn values(&self, category: Category) -> &[String] {
        self.taxonomy.values(category)
    }

    /// Add a trimmed value to `category`. Returns `false` for blanks and duplicates.
    pub fn add(&mut self, category: Category, value: &str) -> Result<bool> {
        let mut next = self.taxonomy.clone();
        if !next.add(category, value) {
            return Ok(false);
        }
        self.commit(next)?;
        Ok(true)
    }

    /// Remove every exact match of `value` from `category`.
    pub fn remove(&mut self, category: Category, value: &str) -> Result<bool> {
        let mut next = self.taxonomy.clone();
        if !next.remove(category, value) {
            return Ok(false);
        }
        self.commit(next)?;
        Ok(true)
    }

    /// Replace the taxonomy with an imported document merged over the defaults.
    ///
    /// On error the current taxonomy is kept.
    pub fn import_from(&mut self, raw: &str) -> Result<&Taxonomy> {
        let imported = Taxonomy::from_json(raw)?;
        self.commit(imported)?;
        tracing::info!("Imported taxonomy");
        Ok(&self.taxonomy)
    }

    /// The current taxonomy as pretty-printed JSON
    pub fn export(&self) -> Result<String> {
        Ok(self.taxonomy.to_json_pretty()?)
    }

    fn commit(&mut self, taxonomy: Taxonomy) -> Result<()> {
        self.gateway.save_taxonomy(&taxonomy)?;
        self.taxonomy = taxonomy;
        Ok(())
    }
}
