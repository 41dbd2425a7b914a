//! Clause sub-builders for the nested query structures (`date_query`,
//! `meta_query`, `tax_query`) the host engine consumes.

mod date;
mod meta;
mod tax;

pub use date::DateQuery;
pub use meta::MetaQuery;
pub use tax::TaxQuery;

pub(crate) use date::date_leaf;
pub(crate) use meta::meta_leaf;
pub(crate) use tax::tax_leaf;

use crate::value::Value;
use serde::ser::{Serialize, Serializer};
use std::fmt;

///
/// Relation
///
/// Boolean relation marker controlling how sibling clause entries combine.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Relation {
    And,
    Or,
}

impl Relation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    /// Parse a relation token, case-insensitively.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_uppercase().as_str() {
            "AND" => Some(Self::And),
            "OR" => Some(Self::Or),
            _ => None,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Relation> for Value {
    fn from(relation: Relation) -> Self {
        Self::Text(relation.as_str().to_string())
    }
}

impl Serialize for Relation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

///
/// ClauseGroup
///
/// Ordered list of clause entries plus an optional relation marker. An entry
/// slot may itself hold another serialized group, so boolean composition
/// nests to arbitrary depth.
///
/// Serialized shape mirrors the host's mixed-array convention:
/// - no relation: a plain list of entries;
/// - relation set: a map carrying `relation` plus the entries under their
///   decimal index keys.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClauseGroup {
    relation: Option<Relation>,
    entries: Vec<Value>,
}

impl ClauseGroup {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            relation: None,
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn relation(&self) -> Option<Relation> {
        self.relation
    }

    #[must_use]
    pub fn entries(&self) -> &[Value] {
        &self.entries
    }

    /// Append one clause entry.
    pub fn push(&mut self, entry: Value) {
        self.entries.push(entry);
    }

    /// Force the relation marker, unconditionally. Idempotent when called
    /// again with the same relation.
    pub fn set_relation(&mut self, relation: Relation) {
        self.relation = Some(relation);
    }

    /// Default the relation to `AND` once the group is about to grow past
    /// its first entry and no explicit relation was set. Called before the
    /// append so a single-entry group stays unmarked.
    pub fn default_relation_when_growing(&mut self) {
        if !self.entries.is_empty() && self.relation.is_none() {
            self.relation = Some(Relation::And);
        }
    }

    // ------------------------------------------------------------------
    // Serialization
    // ------------------------------------------------------------------

    #[must_use]
    pub fn to_value(&self) -> Value {
        match self.relation {
            None => Value::List(self.entries.clone()),
            Some(relation) => {
                let mut entries = Vec::with_capacity(self.entries.len() + 1);
                entries.push(("relation".to_string(), Value::from(relation)));
                for (index, entry) in self.entries.iter().enumerate() {
                    entries.push((index.to_string(), entry.clone()));
                }
                Value::Map(entries)
            }
        }
    }

    /// Rebuild a group from its serialized form, for the read-modify-write
    /// paths that grow a group already stored in a parent container. Any
    /// other shape (a manually-written scalar, say) starts a fresh group.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::List(entries) => Self {
                relation: None,
                entries,
            },
            Value::Map(pairs) => {
                let mut relation = None;
                let mut entries = Vec::with_capacity(pairs.len());
                for (key, entry) in pairs {
                    if key == "relation" {
                        relation = entry.as_text().and_then(Relation::parse);
                    } else {
                        entries.push(entry);
                    }
                }
                Self { relation, entries }
            }
            _ => Self::new(),
        }
    }
}

impl From<ClauseGroup> for Value {
    fn from(group: ClauseGroup) -> Self {
        group.to_value()
    }
}
