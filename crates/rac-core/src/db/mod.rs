//! Database layer for RAC

mod connection;
mod gateway;
mod migrations;
mod store;

pub use connection::Database;
pub use gateway::{PersistenceGateway, StoredRecords, RECORDS_KEY, TAXONOMY_KEY};
pub use store::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
