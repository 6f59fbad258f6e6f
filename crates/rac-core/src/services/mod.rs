//! Stateful services that own the in-memory collections and persist them.

mod records;
mod taxonomy;

pub use records::{RecordService, UpsertOutcome};
pub use taxonomy::TaxonomyStore;
