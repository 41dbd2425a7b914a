use crate::{error::Error, value::Value};
use serde::ser::{Serialize, Serializer};

///
/// QueryArgs
///
/// Generic argument container: an insertion-ordered mapping of option name to
/// value. Keys are unique and last write wins; the host engine itself imposes
/// no ordering requirements beyond what it reads by name.
///
/// A container is constructed empty, seeded from a fully-formed map value, or
/// cloned from another builder of the same family. Seeding from anything but
/// a map fails with [`Error::InvalidArgument`] naming the shape received.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryArgs {
    entries: Vec<(String, Value)>,
}

impl QueryArgs {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Store `value` under `key`, silently overwriting any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
        self
    }

    /// Bug-compatible batch fold carried over from the reference
    /// implementation: each entry's **value** is used as both key and value,
    /// so passing an associative map here does **not** set the given keys.
    /// A non-text folded key is rejected the way the original rejects
    /// non-string keys. Prefer [`QueryArgs::set`] or seeding via
    /// `TryFrom<Value>`, which copy entries verbatim.
    pub fn set_map(&mut self, map: &Value) -> Result<&mut Self, Error> {
        let values: Vec<&Value> = match map {
            Value::Map(entries) => entries.iter().map(|(_, v)| v).collect(),
            Value::List(items) => items.iter().collect(),
            other => {
                return Err(Error::invalid_argument(format!(
                    "set_map() expects a map or a list; got {}",
                    other.kind()
                )));
            }
        };

        for value in values {
            let Some(key) = value.as_text() else {
                return Err(Error::invalid_argument(format!(
                    "invalid key provided to set(): must be a text value, got {}",
                    value.kind()
                )));
            };
            self.set(key.to_string(), value.clone());
        }

        Ok(self)
    }

    /// Stored value for `key`, if any.
    #[must_use]
    pub fn get_key(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }

    /// Stored value for `key`, or the given default when absent.
    #[must_use]
    pub fn get_key_or(&self, key: &str, default: Value) -> Value {
        self.get_key(key).cloned().unwrap_or(default)
    }

    /// Drop every stored entry.
    pub fn reset(&mut self) -> &mut Self {
        self.entries.clear();
        self
    }

    // ------------------------------------------------------------------
    // Serialization
    // ------------------------------------------------------------------

    /// The fully-assembled argument map handed to host retrieval functions.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Map(self.entries.clone())
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Map(self.entries)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, Value)> {
        self.entries.iter()
    }
}

impl TryFrom<Value> for QueryArgs {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Error> {
        match value {
            Value::Map(entries) => Ok(Self { entries }),
            other => Err(Error::invalid_argument(format!(
                "query arguments must be a key-value map or an existing builder; got {}",
                other.kind()
            ))),
        }
    }
}

impl Serialize for QueryArgs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}
