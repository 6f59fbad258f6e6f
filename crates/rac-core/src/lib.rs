//! rac-core - Core library for RAC
//!
//! This crate contains the record model and validator, the taxonomy, the
//! persistence layer, the export codecs and the query engine used by the
//! RAC interfaces.

pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod search;
pub mod services;
pub mod util;

pub use error::{Error, ImportError, Result, ValidationError};
pub use models::{Category, Difficulty, Record, RecordDraft, RecordId, Taxonomy};
pub use search::{RecordFilter, Summary, UnitFilter};
pub use services::{RecordService, TaxonomyStore};
