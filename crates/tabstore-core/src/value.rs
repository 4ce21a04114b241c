//! Scalar cell values exchanged at the storage boundary.

use crate::schema::FieldType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Strings accepted as `true` when casting to boolean (compared lowercased).
const TRUE_VALUES: &[&str] = &["true", "yes", "y", "t", "1"];

/// Strings accepted as `false` when casting to boolean (compared lowercased).
const FALSE_VALUES: &[&str] = &["false", "no", "n", "f", "0"];

/// A single cell value.
///
/// Serializes untagged, so a JSON row such as `[1, "Ann", null, true]` maps
/// directly onto a `Vec<Value>`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Integer(i64),
    Number(f64),
    String(String),
}

/// A positional row, aligned with a schema's field order.
pub type Row = Vec<Value>;

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Convert this value to `target`, returning `None` when no lossless
    /// conversion exists. `Null` converts to every type.
    pub fn cast(&self, target: FieldType) -> Option<Value> {
        match (target, self) {
            (_, Value::Null) => Some(Value::Null),

            (FieldType::String, Value::String(s)) => Some(Value::String(s.clone())),
            (FieldType::String, _) => None,

            (FieldType::Integer, Value::Integer(i)) => Some(Value::Integer(*i)),
            (FieldType::Integer, Value::Number(n)) => integral(*n).map(Value::Integer),
            (FieldType::Integer, Value::String(s)) => s.trim().parse().ok().map(Value::Integer),
            (FieldType::Integer, Value::Boolean(_)) => None,

            (FieldType::Number, Value::Number(n)) => Some(Value::Number(*n)),
            (FieldType::Number, Value::Integer(i)) => widened(*i).map(Value::Number),
            (FieldType::Number, Value::String(s)) => s.trim().parse().ok().map(Value::Number),
            (FieldType::Number, Value::Boolean(_)) => None,

            (FieldType::Boolean, Value::Boolean(b)) => Some(Value::Boolean(*b)),
            (FieldType::Boolean, Value::String(s)) => parse_bool(s).map(Value::Boolean),
            (FieldType::Boolean, _) => None,
        }
    }
}

fn integral(n: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
    if n.is_finite() && n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
        Some(n as i64)
    } else {
        None
    }
}

/// `i` as an `f64`, when the float holds it exactly.
fn widened(i: i64) -> Option<f64> {
    let n = i as f64;
    if n < i64::MAX as f64 && n as i64 == i {
        Some(n)
    } else {
        None
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    let lowered = s.trim().to_lowercase();
    if TRUE_VALUES.contains(&lowered.as_str()) {
        Some(true)
    } else if FALSE_VALUES.contains(&lowered.as_str()) {
        Some(false)
    } else {
        None
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

/// Build a [`Row`] from heterogeneous literals.
///
/// ```
/// use tabstore_core::{row, Value};
/// let r = row![1, "Ann", true];
/// assert_eq!(r, vec![Value::Integer(1), Value::from("Ann"), Value::Boolean(true)]);
/// ```
#[macro_export]
macro_rules! row {
    ($($value:expr),* $(,)?) => {
        vec![$($crate::Value::from($value)),*]
    };
}

#[cfg(test)]
#[path = "value_test.rs"]
mod tests;
