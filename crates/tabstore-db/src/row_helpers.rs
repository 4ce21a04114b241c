//! Conversions between DuckDB cells and logical [`Value`]s.

use tabstore_core::{FieldType, Value};

/// Read column `idx` of `row` as the logical type of its field.
///
/// The column was created from the same mapping, so the typed getter always
/// matches the physical type; NULL cells become [`Value::Null`].
pub(crate) fn read_value(
    row: &duckdb::Row<'_>,
    idx: usize,
    field_type: FieldType,
) -> duckdb::Result<Value> {
    let value = match field_type {
        FieldType::String => Value::from(row.get::<_, Option<String>>(idx)?),
        FieldType::Integer => Value::from(row.get::<_, Option<i64>>(idx)?),
        FieldType::Number => Value::from(row.get::<_, Option<f64>>(idx)?),
        FieldType::Boolean => Value::from(row.get::<_, Option<bool>>(idx)?),
    };
    Ok(value)
}

/// Convert a coerced value into a DuckDB parameter.
pub(crate) fn to_sql_value(value: &Value) -> duckdb::types::Value {
    match value {
        Value::Null => duckdb::types::Value::Null,
        Value::Boolean(b) => duckdb::types::Value::Boolean(*b),
        Value::Integer(i) => duckdb::types::Value::BigInt(*i),
        Value::Number(n) => duckdb::types::Value::Double(*n),
        Value::String(s) => duckdb::types::Value::Text(s.clone()),
    }
}
