// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

// Data records that templates are bound against.


mod loader;

use std::{fmt, rc::Rc};

use hashlink::LinkedHashMap;

pub use loader::parse_data_str;

#[derive(Clone, PartialEq, PartialOrd, Debug, Eq, Ord, Hash)]
pub enum Value {
    // Numbers that don't fit in an i64 (e.g. floating point).
    Real(Rc<String>),
    Integer(i64),
    String(Rc<String>),
    Boolean(bool),
    Array(Rc<Vec<Value>>),
    Hash(Rc<LinkedHashMap<Value, Value>>),
    Null,
}

impl Value {
    pub fn from_pairs<K, V, I>(pairs: I) -> Value
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let map = pairs
            .into_iter()
            .map(|(key, value)| (Value::String(Rc::new(key.into())), value.into()))
            .collect::<LinkedHashMap<_, _>>();
        Value::Hash(Rc::new(map))
    }

    /// Looks up one path segment: a key of a hash or an index into an array.
    pub fn member(&self, segment: &str) -> Option<&Value> {
        match self {
            Value::Hash(map) => {
                let key = Value::String(Rc::new(segment.to_string()));
                map.get(&key)
                    .or_else(|| segment.parse::<i64>().ok().and_then(|i| map.get(&Value::Integer(i))))
            }
            Value::Array(values) => segment.parse::<usize>().ok().and_then(|i| values.get(i)),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Real(value) | Value::String(value) => f.write_str(value),
            Value::Integer(value) => write!(f, "{}", value),
            Value::Boolean(value) => write!(f, "{}", value),
            Value::Array(values) => {
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", value)?;
                }
                Ok(())
            }
            Value::Hash(_) | Value::Null => Ok(()),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(Rc::new(value.to_string()))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(Rc::new(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(Rc::new(value.to_string()))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::Array(Rc::new(values))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
