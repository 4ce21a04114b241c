//! Logical <-> physical column type mapping.
//!
//! | logical   | DuckDB    |
//! |-----------|-----------|
//! | `string`  | `VARCHAR` |
//! | `integer` | `BIGINT`  |
//! | `number`  | `DOUBLE`  |
//! | `boolean` | `BOOLEAN` |
//!
//! The mapping is a bijection: [`logical_type`] inverts [`physical_type`]
//! and rejects every other reflected type.

use tabstore_core::FieldType;

/// DDL type used when creating a column of the given logical type.
pub fn physical_type(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::String => "VARCHAR",
        FieldType::Integer => "BIGINT",
        FieldType::Number => "DOUBLE",
        FieldType::Boolean => "BOOLEAN",
    }
}

/// Logical type of a reflected column, from its `information_schema` data type.
pub fn logical_type(data_type: &str) -> Option<FieldType> {
    match data_type.trim().to_ascii_uppercase().as_str() {
        "VARCHAR" => Some(FieldType::String),
        "BIGINT" => Some(FieldType::Integer),
        "DOUBLE" => Some(FieldType::Number),
        "BOOLEAN" => Some(FieldType::Boolean),
        _ => None,
    }
}
