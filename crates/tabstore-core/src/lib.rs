//! tabstore-core - Core library for tabstore
//!
//! This crate provides the portable table schema descriptor, the scalar
//! value model with its schema-driven coercion rules, store configuration,
//! and SQL identifier quoting shared by the storage backends.

pub mod config;
pub mod error;
pub mod schema;
pub mod sql_utils;
pub mod value;

pub use config::StoreConfig;
pub use error::{CoreError, CoreResult};
pub use schema::{Field, FieldType, Schema};
pub use value::{Row, Value};
