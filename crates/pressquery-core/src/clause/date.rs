use crate::{
    clause::{ClauseGroup, Relation},
    compare::normalize_compare,
    value::Value,
};

///
/// DateQuery
///
/// Date clause sub-builder. Accumulates ordered clause maps plus an optional
/// group relation. Groups nest through [`DateQuery::where_group`].
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DateQuery {
    group: ClauseGroup,
}

impl DateQuery {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            group: ClauseGroup::new(),
        }
    }

    // ------------------------------------------------------------------
    // Clause accumulation
    // ------------------------------------------------------------------

    /// Append a bare `{key: value}` clause.
    #[must_use]
    pub fn where_clause(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.where_full(key, value, None, false, None)
    }

    /// Append a clause with the optional qualifiers. `compare` is normalized
    /// and attached only when non-empty, `inclusive` only when true, and
    /// `column` only when non-empty.
    #[must_use]
    pub fn where_full(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
        compare: Option<&str>,
        inclusive: bool,
        column: Option<&str>,
    ) -> Self {
        self.group.push(date_leaf(key, value, compare, inclusive, column));
        self
    }

    /// Append a literal caller-supplied clause map verbatim.
    #[must_use]
    pub fn where_map(mut self, clause: Value) -> Self {
        self.group.push(clause);
        self
    }

    /// Configure a fresh sub-builder and append its serialized group as one
    /// nested entry.
    #[must_use]
    pub fn where_group(mut self, configure: impl FnOnce(Self) -> Self) -> Self {
        let child = configure(Self::new());
        self.group.push(child.group.to_value());
        self
    }

    // ------------------------------------------------------------------
    // OR variants: mark the group relation, then delegate
    // ------------------------------------------------------------------

    #[must_use]
    pub fn or_where_clause(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.or_where_full(key, value, None, false, None)
    }

    #[must_use]
    pub fn or_where_full(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
        compare: Option<&str>,
        inclusive: bool,
        column: Option<&str>,
    ) -> Self {
        self.group.set_relation(Relation::Or);
        self.where_full(key, value, compare, inclusive, column)
    }

    #[must_use]
    pub fn or_where_map(mut self, clause: Value) -> Self {
        self.group.set_relation(Relation::Or);
        self.where_map(clause)
    }

    #[must_use]
    pub fn or_where_group(mut self, configure: impl FnOnce(Self) -> Self) -> Self {
        self.group.set_relation(Relation::Or);
        self.where_group(configure)
    }

    // ------------------------------------------------------------------
    // Bound conveniences
    // ------------------------------------------------------------------

    /// Match dates before `date`, optionally inclusive, optionally against
    /// an explicit column instead of the host's default date column.
    #[must_use]
    pub fn where_before(
        self,
        date: impl Into<Value>,
        inclusive: bool,
        column: Option<&str>,
    ) -> Self {
        self.where_full("before", date, None, inclusive, column)
    }

    #[must_use]
    pub fn or_where_before(
        self,
        date: impl Into<Value>,
        inclusive: bool,
        column: Option<&str>,
    ) -> Self {
        self.or_where_full("before", date, None, inclusive, column)
    }

    /// Match dates after `date`.
    #[must_use]
    pub fn where_after(
        self,
        date: impl Into<Value>,
        inclusive: bool,
        column: Option<&str>,
    ) -> Self {
        self.where_full("after", date, None, inclusive, column)
    }

    #[must_use]
    pub fn or_where_after(
        self,
        date: impl Into<Value>,
        inclusive: bool,
        column: Option<&str>,
    ) -> Self {
        self.or_where_full("after", date, None, inclusive, column)
    }

    // ------------------------------------------------------------------
    // Serialization
    // ------------------------------------------------------------------

    #[must_use]
    pub fn to_value(&self) -> Value {
        self.group.to_value()
    }

    #[must_use]
    pub fn into_group(self) -> ClauseGroup {
        self.group
    }

    #[must_use]
    pub const fn group(&self) -> &ClauseGroup {
        &self.group
    }
}

/// Build one date clause map with the optional qualifiers attached.
pub(crate) fn date_leaf(
    key: impl Into<String>,
    value: impl Into<Value>,
    compare: Option<&str>,
    inclusive: bool,
    column: Option<&str>,
) -> Value {
    let mut clause = vec![(key.into(), value.into())];

    if let Some(compare) = compare.filter(|c| !c.is_empty()) {
        clause.push(("compare".to_string(), Value::from(normalize_compare(compare))));
    }
    if inclusive {
        clause.push(("inclusive".to_string(), Value::Bool(true)));
    }
    if let Some(column) = column.filter(|c| !c.is_empty()) {
        clause.push(("column".to_string(), Value::from(column)));
    }

    Value::Map(clause)
}
