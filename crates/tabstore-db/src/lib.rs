//! tabstore-db - Table storage for tabstore
//!
//! This crate provides [`TableStore`], which creates, drops, describes, reads
//! and writes DuckDB tables described by `tabstore-core` schema descriptors,
//! plus the fixed logical/physical type mapping it relies on.

pub mod error;
pub mod mapping;
pub(crate) mod row_helpers;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use store::TableStore;
