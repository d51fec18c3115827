use std::collections::BTreeMap;

use miniserde::json::{Array, Number, Object, Value};

use crate::error::{Error, Result};

/// A JSON value carried by an application-defined claim
///
/// Objects are ordered by key, so the same claim set always serializes to the
/// same JSON text.
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<ClaimValue>),
    Object(BTreeMap<String, ClaimValue>),
}

impl ClaimValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ClaimValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ClaimValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ClaimValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value as a float; integers are widened
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ClaimValue::Integer(n) => Some(*n as f64),
            ClaimValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ClaimValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[ClaimValue]> {
        match self {
            ClaimValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, ClaimValue>> {
        match self {
            ClaimValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Check that the value can be written as JSON and read back unchanged
    ///
    /// Walks the tree with an explicit stack. Fails on nesting deeper than
    /// `max_depth` and on NaN or infinite floats, which JSON cannot carry.
    pub(crate) fn check_encodable(&self, name: &str, max_depth: usize) -> Result<()> {
        let mut pending = vec![(self, 0usize)];
        while let Some((value, depth)) = pending.pop() {
            match value {
                ClaimValue::Float(f) if !f.is_finite() => {
                    return Err(Error::InvalidClaims(format!(
                        "claim '{name}' contains a non-finite number"
                    )));
                }
                ClaimValue::Array(_) | ClaimValue::Object(_) if depth >= max_depth => {
                    return Err(Error::InvalidClaims(format!(
                        "claim '{name}' is nested deeper than {max_depth} levels"
                    )));
                }
                ClaimValue::Array(items) => pending.extend(items.iter().map(|v| (v, depth + 1))),
                ClaimValue::Object(map) => pending.extend(map.values().map(|v| (v, depth + 1))),
                _ => {}
            }
        }
        Ok(())
    }

    pub(crate) fn to_json(&self) -> Value {
        match self {
            ClaimValue::Null => Value::Null,
            ClaimValue::Bool(b) => Value::Bool(*b),
            ClaimValue::Integer(n) if *n >= 0 => Value::Number(Number::U64(*n as u64)),
            ClaimValue::Integer(n) => Value::Number(Number::I64(*n)),
            ClaimValue::Float(f) => Value::Number(Number::F64(*f)),
            ClaimValue::String(s) => Value::String(s.clone()),
            ClaimValue::Array(items) => {
                let mut array = Array::new();
                array.extend(items.iter().map(ClaimValue::to_json));
                Value::Array(array)
            }
            ClaimValue::Object(map) => Value::Object(object_from_map(map)),
        }
    }

    pub(crate) fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => ClaimValue::Null,
            Value::Bool(b) => ClaimValue::Bool(*b),
            Value::Number(Number::U64(n)) => match i64::try_from(*n) {
                Ok(n) => ClaimValue::Integer(n),
                // Beyond i64: keep magnitude, lose precision
                Err(_) => ClaimValue::Float(*n as f64),
            },
            Value::Number(Number::I64(n)) => ClaimValue::Integer(*n),
            Value::Number(Number::F64(f)) => ClaimValue::Float(*f),
            Value::String(s) => ClaimValue::String(s.clone()),
            Value::Array(items) => {
                ClaimValue::Array(items.iter().map(ClaimValue::from_json).collect())
            }
            Value::Object(object) => ClaimValue::Object(
                object
                    .iter()
                    .map(|(name, value)| (name.clone(), ClaimValue::from_json(value)))
                    .collect(),
            ),
        }
    }
}

/// Whether a parsed JSON value nests arrays and objects deeper than `max_depth`
///
/// Iterative, so it is safe on input of any depth.
pub(crate) fn nesting_exceeds(value: &Value, max_depth: usize) -> bool {
    let mut pending = vec![(value, 0usize)];
    while let Some((value, depth)) = pending.pop() {
        match value {
            Value::Array(_) | Value::Object(_) if depth >= max_depth => return true,
            Value::Array(items) => pending.extend(items.iter().map(|v| (v, depth + 1))),
            Value::Object(object) => pending.extend(object.values().map(|v| (v, depth + 1))),
            _ => {}
        }
    }
    false
}

pub(crate) fn object_from_map(map: &BTreeMap<String, ClaimValue>) -> Object {
    let mut object = Object::new();
    for (name, value) in map {
        object.insert(name.clone(), value.to_json());
    }
    object
}

impl From<bool> for ClaimValue {
    fn from(value: bool) -> Self {
        ClaimValue::Bool(value)
    }
}

impl From<i64> for ClaimValue {
    fn from(value: i64) -> Self {
        ClaimValue::Integer(value)
    }
}

impl From<i32> for ClaimValue {
    fn from(value: i32) -> Self {
        ClaimValue::Integer(value.into())
    }
}

impl From<u32> for ClaimValue {
    fn from(value: u32) -> Self {
        ClaimValue::Integer(value.into())
    }
}

impl From<f64> for ClaimValue {
    fn from(value: f64) -> Self {
        ClaimValue::Float(value)
    }
}

impl From<&str> for ClaimValue {
    fn from(value: &str) -> Self {
        ClaimValue::String(value.to_string())
    }
}

impl From<String> for ClaimValue {
    fn from(value: String) -> Self {
        ClaimValue::String(value)
    }
}

impl<T: Into<ClaimValue>> From<Vec<T>> for ClaimValue {
    fn from(values: Vec<T>) -> Self {
        ClaimValue::Array(values.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, ClaimValue>> for ClaimValue {
    fn from(map: BTreeMap<String, ClaimValue>) -> Self {
        ClaimValue::Object(map)
    }
}

impl<T: Into<ClaimValue>> From<Option<T>> for ClaimValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ClaimValue::Null, Into::into)
    }
}
