pub mod add;
pub mod common;
pub mod config;
pub mod delete;
pub mod edit;
pub mod export;
pub mod import;
pub mod list;
pub mod summary;
pub mod taxonomy;
