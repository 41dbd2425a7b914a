use crate::{
    clause::{ClauseGroup, Relation},
    compare::normalize_compare,
    value::Value,
};

///
/// TaxQuery
///
/// Taxonomy clause sub-builder. Leaf entries are
/// `{taxonomy, field, terms, include_children, operator}` maps; the operator
/// runs through the compare normalizer, so `"in"` / `"!in"` / `"exists"`
/// become their SQL-style spellings. Unlike the meta builder, the `and_where`
/// / `or_where` variants force the group relation *before* appending.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaxQuery {
    group: ClauseGroup,
}

impl TaxQuery {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            group: ClauseGroup::new(),
        }
    }

    // ------------------------------------------------------------------
    // Clause accumulation
    // ------------------------------------------------------------------

    #[must_use]
    pub fn where_clause(
        mut self,
        taxonomy: impl Into<String>,
        field: Option<&str>,
        terms: impl Into<Value>,
        operator: &str,
        children: bool,
    ) -> Self {
        self.group.default_relation_when_growing();
        self.group
            .push(tax_leaf(taxonomy, field, terms.into(), operator, children));
        self
    }

    /// Configure a fresh sub-builder and merge it in. An empty builder adopts
    /// the child's group wholesale (relation included); a non-empty one
    /// appends the child's serialized group as a single nested entry.
    #[must_use]
    pub fn where_group(self, configure: impl FnOnce(Self) -> Self) -> Self {
        self.where_nested(configure(Self::new()))
    }

    #[must_use]
    pub fn where_nested(mut self, child: Self) -> Self {
        self.group.default_relation_when_growing();

        if self.group.is_empty() && self.group.relation().is_none() {
            self.group = child.group;
        } else {
            self.group.push(child.group.to_value());
        }

        self
    }

    // ------------------------------------------------------------------
    // AND / OR variants: force the relation, then delegate
    // ------------------------------------------------------------------

    #[must_use]
    pub fn and_where(
        self,
        taxonomy: impl Into<String>,
        field: Option<&str>,
        terms: impl Into<Value>,
        operator: &str,
        children: bool,
    ) -> Self {
        self.relation(Relation::And)
            .where_clause(taxonomy, field, terms, operator, children)
    }

    #[must_use]
    pub fn and_where_group(self, configure: impl FnOnce(Self) -> Self) -> Self {
        self.relation(Relation::And).where_group(configure)
    }

    #[must_use]
    pub fn or_where(
        self,
        taxonomy: impl Into<String>,
        field: Option<&str>,
        terms: impl Into<Value>,
        operator: &str,
        children: bool,
    ) -> Self {
        self.relation(Relation::Or)
            .where_clause(taxonomy, field, terms, operator, children)
    }

    #[must_use]
    pub fn or_where_group(self, configure: impl FnOnce(Self) -> Self) -> Self {
        self.relation(Relation::Or).where_group(configure)
    }

    fn relation(mut self, relation: Relation) -> Self {
        self.group.set_relation(relation);
        self
    }

    // ------------------------------------------------------------------
    // Operator shorthands
    // ------------------------------------------------------------------

    #[must_use]
    pub fn where_in(
        self,
        taxonomy: impl Into<String>,
        field: &str,
        terms: impl Into<Value>,
        children: bool,
    ) -> Self {
        self.where_clause(taxonomy, Some(field), terms, "in", children)
    }

    #[must_use]
    pub fn and_where_in(
        self,
        taxonomy: impl Into<String>,
        field: &str,
        terms: impl Into<Value>,
        children: bool,
    ) -> Self {
        self.and_where(taxonomy, Some(field), terms, "in", children)
    }

    #[must_use]
    pub fn or_where_in(
        self,
        taxonomy: impl Into<String>,
        field: &str,
        terms: impl Into<Value>,
        children: bool,
    ) -> Self {
        self.or_where(taxonomy, Some(field), terms, "in", children)
    }

    #[must_use]
    pub fn where_not_in(
        self,
        taxonomy: impl Into<String>,
        field: &str,
        terms: impl Into<Value>,
        children: bool,
    ) -> Self {
        self.where_clause(taxonomy, Some(field), terms, "!in", children)
    }

    #[must_use]
    pub fn and_where_not_in(
        self,
        taxonomy: impl Into<String>,
        field: &str,
        terms: impl Into<Value>,
        children: bool,
    ) -> Self {
        self.and_where(taxonomy, Some(field), terms, "!in", children)
    }

    #[must_use]
    pub fn or_where_not_in(
        self,
        taxonomy: impl Into<String>,
        field: &str,
        terms: impl Into<Value>,
        children: bool,
    ) -> Self {
        self.or_where(taxonomy, Some(field), terms, "!in", children)
    }

    #[must_use]
    pub fn where_exists(
        self,
        taxonomy: impl Into<String>,
        field: &str,
        terms: impl Into<Value>,
        children: bool,
    ) -> Self {
        self.where_clause(taxonomy, Some(field), terms, "exists", children)
    }

    #[must_use]
    pub fn and_where_exists(
        self,
        taxonomy: impl Into<String>,
        field: &str,
        terms: impl Into<Value>,
        children: bool,
    ) -> Self {
        self.and_where(taxonomy, Some(field), terms, "exists", children)
    }

    /// Historical accident kept for compatibility: this marks the group `AND`
    /// rather than `OR`, exactly like [`Self::and_where_exists`].
    #[must_use]
    pub fn or_where_exists(
        self,
        taxonomy: impl Into<String>,
        field: &str,
        terms: impl Into<Value>,
        children: bool,
    ) -> Self {
        self.and_where(taxonomy, Some(field), terms, "exists", children)
    }

    #[must_use]
    pub fn where_not_exists(
        self,
        taxonomy: impl Into<String>,
        field: &str,
        terms: impl Into<Value>,
        children: bool,
    ) -> Self {
        self.where_clause(taxonomy, Some(field), terms, "!exists", children)
    }

    #[must_use]
    pub fn and_where_not_exists(
        self,
        taxonomy: impl Into<String>,
        field: &str,
        terms: impl Into<Value>,
        children: bool,
    ) -> Self {
        self.and_where(taxonomy, Some(field), terms, "!exists", children)
    }

    #[must_use]
    pub fn or_where_not_exists(
        self,
        taxonomy: impl Into<String>,
        field: &str,
        terms: impl Into<Value>,
        children: bool,
    ) -> Self {
        self.or_where(taxonomy, Some(field), terms, "!exists", children)
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

/// Build one taxonomy clause map. A missing `field` is carried as an explicit
/// null so the clause shape stays uniform for the host.
pub(crate) fn tax_leaf(
    taxonomy: impl Into<String>,
    field: Option<&str>,
    terms: Value,
    operator: &str,
    children: bool,
) -> Value {
    Value::Map(vec![
        ("taxonomy".to_string(), Value::from(taxonomy.into())),
        ("field".to_string(), field.map_or(Value::Null, Value::from)),
        ("terms".to_string(), terms),
        ("include_children".to_string(), Value::Bool(children)),
        (
            "operator".to_string(),
            Value::from(normalize_compare(operator)),
        ),
    ])
}
