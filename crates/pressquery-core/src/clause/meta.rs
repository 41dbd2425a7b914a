use crate::{
    clause::{ClauseGroup, Relation},
    compare::{normalize_cast, normalize_compare},
    value::Value,
};

///
/// MetaQuery
///
/// Custom-field clause sub-builder. Leaf entries are
/// `{key, value?, compare, type}` maps; `compare` runs through the operator
/// normalizer and `type` is upper-cased. Once the group grows past one entry
/// without an explicit relation, it defaults to `AND`; the `and_where_*` /
/// `or_where_*` variants force the group relation *after* appending, so the
/// marker always describes the whole group, never a single entry.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetaQuery {
    group: ClauseGroup,
}

impl MetaQuery {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            group: ClauseGroup::new(),
        }
    }

    // ------------------------------------------------------------------
    // Clause accumulation
    // ------------------------------------------------------------------

    /// `key = value`, cast as `CHAR`.
    #[must_use]
    pub fn where_clause(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.where_cast(key, value, "=", "CHAR")
    }

    #[must_use]
    pub fn where_cmp(
        self,
        key: impl Into<String>,
        value: impl Into<Value>,
        compare: &str,
    ) -> Self {
        self.where_cast(key, value, compare, "CHAR")
    }

    #[must_use]
    pub fn where_cast(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
        compare: &str,
        cast: &str,
    ) -> Self {
        self.group.default_relation_when_growing();
        self.group
            .push(meta_leaf(key, Some(value.into()), compare, cast));
        self
    }

    /// Value-less clause, for `EXISTS`-style compares.
    #[must_use]
    pub fn where_key(self, key: impl Into<String>) -> Self {
        self.where_cmp_key(key, "=")
    }

    #[must_use]
    pub fn where_cmp_key(mut self, key: impl Into<String>, compare: &str) -> Self {
        self.group.default_relation_when_growing();
        self.group.push(meta_leaf(key, None, compare, "CHAR"));
        self
    }

    /// Configure a fresh sub-builder and append its serialized group as one
    /// nested entry.
    #[must_use]
    pub fn where_group(mut self, configure: impl FnOnce(Self) -> Self) -> Self {
        self.group.default_relation_when_growing();
        let child = configure(Self::new());
        self.group.push(child.group.to_value());
        self
    }

    // ------------------------------------------------------------------
    // AND / OR variants: append, then force the group relation
    // ------------------------------------------------------------------

    #[must_use]
    pub fn and_where(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.where_clause(key, value).relation(Relation::And)
    }

    #[must_use]
    pub fn and_where_cmp(
        self,
        key: impl Into<String>,
        value: impl Into<Value>,
        compare: &str,
    ) -> Self {
        self.where_cmp(key, value, compare).relation(Relation::And)
    }

    #[must_use]
    pub fn and_where_cast(
        self,
        key: impl Into<String>,
        value: impl Into<Value>,
        compare: &str,
        cast: &str,
    ) -> Self {
        self.where_cast(key, value, compare, cast)
            .relation(Relation::And)
    }

    #[must_use]
    pub fn and_where_group(self, configure: impl FnOnce(Self) -> Self) -> Self {
        self.where_group(configure).relation(Relation::And)
    }

    #[must_use]
    pub fn or_where(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.where_clause(key, value).relation(Relation::Or)
    }

    #[must_use]
    pub fn or_where_cmp(
        self,
        key: impl Into<String>,
        value: impl Into<Value>,
        compare: &str,
    ) -> Self {
        self.where_cmp(key, value, compare).relation(Relation::Or)
    }

    #[must_use]
    pub fn or_where_cast(
        self,
        key: impl Into<String>,
        value: impl Into<Value>,
        compare: &str,
        cast: &str,
    ) -> Self {
        self.where_cast(key, value, compare, cast)
            .relation(Relation::Or)
    }

    #[must_use]
    pub fn or_where_group(self, configure: impl FnOnce(Self) -> Self) -> Self {
        self.where_group(configure).relation(Relation::Or)
    }

    fn relation(mut self, relation: Relation) -> Self {
        self.group.set_relation(relation);
        self
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

/// Build one meta clause map. `value` is omitted entirely when not provided
/// (the `EXISTS` / `NOT EXISTS` shapes); compare and cast are normalized.
pub(crate) fn meta_leaf(
    key: impl Into<String>,
    value: Option<Value>,
    compare: &str,
    cast: &str,
) -> Value {
    let mut clause = vec![("key".to_string(), Value::from(key.into()))];

    if let Some(value) = value {
        clause.push(("value".to_string(), value));
    }
    clause.push(("compare".to_string(), Value::from(normalize_compare(compare))));
    clause.push(("type".to_string(), Value::from(normalize_cast(cast))));

    Value::Map(clause)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(key: &str, value: &str) -> Value {
        Value::map([
            ("key", Value::from(key)),
            ("value", Value::from(value)),
            ("compare", Value::from("=")),
            ("type", Value::from("CHAR")),
        ])
    }

    #[test]
    fn single_clause_stays_unmarked() {
        let q = MetaQuery::new().where_clause("color", "blue");
        assert_eq!(q.to_value(), Value::List(vec![leaf("color", "blue")]));
    }

    #[test]
    fn growing_defaults_the_relation_to_and() {
        let q = MetaQuery::new()
            .where_clause("color", "blue")
            .where_clause("size", "small");
        assert_eq!(q.group().relation(), Some(Relation::And));
    }

    #[test]
    fn compare_and_cast_are_normalized() {
        let q = MetaQuery::new().where_cast("price", Value::from(vec![20, 100]), "between", "numeric");
        assert_eq!(
            q.group().entries()[0],
            Value::map([
                ("key", Value::from("price")),
                ("value", Value::from(vec![20, 100])),
                ("compare", Value::from("BETWEEN")),
                ("type", Value::from("NUMERIC")),
            ])
        );
    }

    #[test]
    fn value_is_omitted_for_key_only_clauses() {
        let q = MetaQuery::new().where_cmp_key("color", "!exists");
        assert_eq!(
            q.group().entries()[0],
            Value::map([
                ("key", Value::from("color")),
                ("compare", Value::from("NOT EXISTS")),
                ("type", Value::from("CHAR")),
            ])
        );
    }

    #[test]
    fn or_where_forces_the_group_relation_after_append() {
        // The forced relation wins regardless of call order.
        let q = MetaQuery::new()
            .where_clause("a", "1")
            .or_where("b", "2")
            .where_clause("c", "3");
        assert_eq!(q.group().relation(), Some(Relation::Or));
        assert_eq!(q.group().len(), 3);

        // Idempotent when repeated.
        let q = q.or_where("d", "4");
        assert_eq!(q.group().relation(), Some(Relation::Or));
    }

    #[test]
    fn nested_group_serializes_with_its_own_relation() {
        let q = MetaQuery::new()
            .where_clause("color", "orange")
            .or_where_group(|inner| {
                inner.where_clause("color", "red").and_where("size", "small")
            });

        assert_eq!(
            q.to_value(),
            Value::map([
                ("relation", Value::from("OR")),
                ("0", leaf("color", "orange")),
                (
                    "1",
                    Value::map([
                        ("relation", Value::from("AND")),
                        ("0", leaf("color", "red")),
                        ("1", leaf("size", "small")),
                    ])
                ),
            ])
        );
    }
}
