//! Data models for RAC

mod draft;
mod record;
mod taxonomy;

pub use draft::{validate_and_build_record, Classification, RecordDraft, MAX_COUNTERPARTIES};
pub use record::{Difficulty, Record, RecordId, VoiceNote};
pub use taxonomy::{Category, Taxonomy};
