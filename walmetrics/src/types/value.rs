use serde::Deserialize;
use std::fmt;

/// A loosely typed cell value captured from the WAL snapshot.
///
/// The snapshot format carries only JSON scalars, so these are the only
/// variants a change record can contain. JSON numbers without a fractional
/// part decode as [`Value::Integer`], all other numbers as [`Value::Real`].
/// Explicit JSON nulls are tolerated and bound as SQL NULL.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// An explicit null.
    Null,
    /// A boolean value.
    Bool(bool),
    /// A 64-bit integer value.
    Integer(i64),
    /// A 64-bit floating point value.
    Real(f64),
    /// A string value.
    Text(String),
}

impl Value {
    /// Returns whether this value is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Integer(value) => write!(f, "{value}"),
            Value::Real(value) => write!(f, "{value}"),
            Value::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}
