//! Table schema descriptors.
//!
//! A [`Schema`] is the portable description of a table: an ordered list of
//! named fields, each with one of four logical types. It serializes to the
//! descriptor shape `{"fields": [{"name": ..., "type": ...}], "missingValues": [...]}`.

use crate::error::{CoreError, CoreResult};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Logical field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
}

impl FieldType {
    /// All supported logical types, in descriptor order.
    pub const ALL: [FieldType; 4] = [
        FieldType::String,
        FieldType::Integer,
        FieldType::Number,
        FieldType::Boolean,
    ];

    /// The descriptor spelling of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "string" => Ok(FieldType::String),
            "integer" => Ok(FieldType::Integer),
            "number" => Ok(FieldType::Number),
            "boolean" => Ok(FieldType::Boolean),
            other => Err(CoreError::UnsupportedType {
                type_name: other.to_string(),
            }),
        }
    }
}

/// A single column of a descriptor.
///
/// The type is kept as written so that a descriptor carrying an unknown type
/// still loads; resolving it through [`Field::field_type`] is what fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,

    #[serde(rename = "type")]
    pub type_name: String,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            type_name: field_type.as_str().to_string(),
        }
    }

    /// Resolve the declared type, failing with `UnsupportedType` for anything
    /// outside string/integer/number/boolean.
    pub fn field_type(&self) -> CoreResult<FieldType> {
        self.type_name.parse()
    }
}

/// Table schema descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<Field>,

    /// String values that stand for NULL when coercing rows.
    #[serde(rename = "missingValues", default = "default_missing_values")]
    pub missing_values: Vec<String>,
}

fn default_missing_values() -> Vec<String> {
    vec![String::new()]
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self {
            fields,
            missing_values: default_missing_values(),
        }
    }

    /// Parse a descriptor from JSON text.
    pub fn from_json(text: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse a descriptor from YAML text.
    pub fn from_yaml(text: &str) -> CoreResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load a descriptor file, choosing the parser by extension
    /// (`.yml`/`.yaml` for YAML, anything else as JSON).
    pub fn load(path: &Path) -> CoreResult<Self> {
        log::debug!("Loading schema descriptor from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yml") | Some("yaml") => Self::from_yaml(&content),
            _ => Self::from_json(&content),
        }
    }

    /// Serialize back to the JSON descriptor shape.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Index of the field called `name`, if any.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Check the descriptor invariants and resolve every field type.
    ///
    /// Returns the logical types in field order. Fails with `InvalidSchema`
    /// for an empty field list, an empty name or a duplicate name, and with
    /// `UnsupportedType` for an unknown type.
    pub fn validate(&self) -> CoreResult<Vec<FieldType>> {
        if self.fields.is_empty() {
            return Err(CoreError::InvalidSchema {
                message: "descriptor must declare at least one field".to_string(),
            });
        }

        let mut seen = HashSet::new();
        let mut types = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            if field.name.is_empty() {
                return Err(CoreError::InvalidSchema {
                    message: "field name cannot be empty".to_string(),
                });
            }
            if !seen.insert(field.name.as_str()) {
                return Err(CoreError::InvalidSchema {
                    message: format!("duplicate field name '{}'", field.name),
                });
            }
            types.push(field.field_type()?);
        }
        Ok(types)
    }

    /// Coerce one positional row to the logical types of this schema.
    ///
    /// A row whose length differs from the field count fails with
    /// `InvalidSchema`.
    pub fn cast_row(&self, row: &[Value]) -> CoreResult<Vec<Value>> {
        if row.len() != self.fields.len() {
            return Err(CoreError::InvalidSchema {
                message: format!(
                    "row has {} values but schema declares {} fields",
                    row.len(),
                    self.fields.len()
                ),
            });
        }
        self.fields
            .iter()
            .zip(row)
            .map(|(field, value)| self.cast_value(field, value))
            .collect()
    }

    /// Coerce a single value to the type of `field`.
    pub fn cast_value(&self, field: &Field, value: &Value) -> CoreResult<Value> {
        let field_type = field.field_type()?;
        if let Value::String(s) = value {
            if self.missing_values.iter().any(|m| m == s) {
                return Ok(Value::Null);
            }
        }
        value.cast(field_type).ok_or_else(|| CoreError::TypeCoercion {
            field: field.name.clone(),
            value: value.to_string(),
            expected: field_type.to_string(),
        })
    }
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
