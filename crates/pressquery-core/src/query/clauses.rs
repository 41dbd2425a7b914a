use crate::{
    args::QueryArgs,
    clause::{ClauseGroup, DateQuery, MetaQuery, Relation, date_leaf, meta_leaf},
    error::Error,
    validate::into_list,
    value::Value,
};

///
/// ArgsSlot
///
/// Access to a builder's argument map. Every entity builder implements this;
/// the clause traits below are all default methods on top of it.
///

pub trait ArgsSlot {
    fn args(&self) -> &QueryArgs;
    fn args_mut(&mut self) -> &mut QueryArgs;
}

/// Read the clause group stored under `key`, or a fresh one.
fn read_group(args: &QueryArgs, key: &str) -> ClauseGroup {
    args.get_key(key)
        .cloned()
        .map_or_else(ClauseGroup::new, ClauseGroup::from_value)
}

fn write_group(args: &mut QueryArgs, key: &str, group: &ClauseGroup) {
    args.set(key, group.to_value());
}

///
/// HasWhere
///
/// Plain top-level argument filters. `where_in` and friends wrap scalars into
/// one-element lists and store them under the conventional `__in` /
/// `__not_in` / `__and` suffixed keys.
///

pub trait HasWhere: ArgsSlot + Sized {
    #[must_use]
    fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args_mut().set(key, value.into());
        self
    }

    #[must_use]
    fn where_in(self, key: &str, values: impl Into<Value>) -> Self {
        let items = into_list(values.into());
        self.set(format!("{key}__in"), Value::List(items))
    }

    #[must_use]
    fn where_not_in(self, key: &str, values: impl Into<Value>) -> Self {
        let items = into_list(values.into());
        self.set(format!("{key}__not_in"), Value::List(items))
    }

    #[must_use]
    fn where_and(self, key: &str, values: impl Into<Value>) -> Self {
        let items = into_list(values.into());
        self.set(format!("{key}__and"), Value::List(items))
    }

    /// Route a filter through a textual operator.
    fn where_op(self, key: &str, operator: &str, value: impl Into<Value>) -> Result<Self, Error> {
        match operator {
            "in" => Ok(self.where_in(key, value)),
            "!in" | "not_in" => Ok(self.where_not_in(key, value)),
            "and" | "&&" | "&" => Ok(self.where_and(key, value)),
            "=" | "==" | "equals" => Ok(self.set(key, value)),
            other => Err(Error::invalid_argument(format!(
                "unsupported operator \"{other}\""
            ))),
        }
    }
}

///
/// HasMetaClauses
///
/// Custom-field clauses accumulated under the `meta_query` argument. Same
/// group semantics as [`MetaQuery`]: growing past one entry defaults the
/// relation to `AND`, and the `and_` / `or_` variants force it after the
/// append.
///

pub trait HasMetaClauses: ArgsSlot + Sized {
    #[must_use]
    fn where_meta(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.where_meta_cast(key, value, "=", "CHAR")
    }

    #[must_use]
    fn where_meta_cmp(
        self,
        key: impl Into<String>,
        value: impl Into<Value>,
        compare: &str,
    ) -> Self {
        self.where_meta_cast(key, value, compare, "CHAR")
    }

    #[must_use]
    fn where_meta_cast(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
        compare: &str,
        cast: &str,
    ) -> Self {
        let mut group = read_group(self.args(), "meta_query");
        group.default_relation_when_growing();
        group.push(meta_leaf(key, Some(value.into()), compare, cast));
        write_group(self.args_mut(), "meta_query", &group);
        self
    }

    /// Value-less clause, for the `EXISTS` comparison.
    #[must_use]
    fn where_meta_exists(self, key: impl Into<String>) -> Self {
        self.push_meta_leaf(meta_leaf(key, None, "exists", "CHAR"))
    }

    #[must_use]
    fn where_meta_not_exists(self, key: impl Into<String>) -> Self {
        self.push_meta_leaf(meta_leaf(key, None, "!exists", "CHAR"))
    }

    #[doc(hidden)]
    #[must_use]
    fn push_meta_leaf(mut self, leaf: Value) -> Self {
        let mut group = read_group(self.args(), "meta_query");
        group.default_relation_when_growing();
        group.push(leaf);
        write_group(self.args_mut(), "meta_query", &group);
        self
    }

    /// Configure a [`MetaQuery`] sub-builder and append its serialized group
    /// as a single nested entry.
    #[must_use]
    fn where_meta_group(mut self, configure: impl FnOnce(MetaQuery) -> MetaQuery) -> Self {
        let child = configure(MetaQuery::new());
        let mut group = read_group(self.args(), "meta_query");
        group.default_relation_when_growing();
        group.push(child.to_value());
        write_group(self.args_mut(), "meta_query", &group);
        self
    }

    #[must_use]
    fn and_where_meta(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.where_meta(key, value).meta_relation(Relation::And)
    }

    #[must_use]
    fn and_where_meta_cmp(
        self,
        key: impl Into<String>,
        value: impl Into<Value>,
        compare: &str,
    ) -> Self {
        self.where_meta_cmp(key, value, compare)
            .meta_relation(Relation::And)
    }

    #[must_use]
    fn and_where_meta_group(self, configure: impl FnOnce(MetaQuery) -> MetaQuery) -> Self {
        self.where_meta_group(configure).meta_relation(Relation::And)
    }

    #[must_use]
    fn or_where_meta(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.where_meta(key, value).meta_relation(Relation::Or)
    }

    #[must_use]
    fn or_where_meta_cmp(
        self,
        key: impl Into<String>,
        value: impl Into<Value>,
        compare: &str,
    ) -> Self {
        self.where_meta_cmp(key, value, compare)
            .meta_relation(Relation::Or)
    }

    #[must_use]
    fn or_where_meta_group(self, configure: impl FnOnce(MetaQuery) -> MetaQuery) -> Self {
        self.where_meta_group(configure).meta_relation(Relation::Or)
    }

    /// Force the relation on the stored `meta_query` group.
    #[must_use]
    fn meta_relation(mut self, relation: Relation) -> Self {
        let mut group = read_group(self.args(), "meta_query");
        group.set_relation(relation);
        write_group(self.args_mut(), "meta_query", &group);
        self
    }
}

///
/// HasDateClauses
///
/// Date clauses accumulated under the `date_query` argument. Unlike the meta
/// clauses, the `or_` variants mark the relation *before* delegating, so the
/// marker applies even when the clause itself is the first entry.
///

pub trait HasDateClauses: ArgsSlot + Sized {
    /// Overwrite the stored date query wholesale.
    #[must_use]
    fn date_query(mut self, query: impl Into<Value>) -> Self {
        self.args_mut().set("date_query", query.into());
        self
    }

    #[must_use]
    fn where_date(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.where_date_full(key, value, None, false, None)
    }

    #[must_use]
    fn where_date_full(
        self,
        key: impl Into<String>,
        value: impl Into<Value>,
        compare: Option<&str>,
        inclusive: bool,
        column: Option<&str>,
    ) -> Self {
        self.where_date_map(date_leaf(key, value.into(), compare, inclusive, column))
    }

    /// Append a pre-built clause map verbatim.
    #[must_use]
    fn where_date_map(mut self, clause: Value) -> Self {
        let mut group = read_group(self.args(), "date_query");
        group.push(clause);
        write_group(self.args_mut(), "date_query", &group);
        self
    }

    /// Configure a [`DateQuery`] sub-builder and append its serialized group
    /// as a single nested entry.
    #[must_use]
    fn where_date_group(mut self, configure: impl FnOnce(DateQuery) -> DateQuery) -> Self {
        let child = configure(DateQuery::new());
        let mut group = read_group(self.args(), "date_query");
        group.push(child.to_value());
        write_group(self.args_mut(), "date_query", &group);
        self
    }

    #[must_use]
    fn or_where_date(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.date_relation(Relation::Or).where_date(key, value)
    }

    #[must_use]
    fn or_where_date_full(
        self,
        key: impl Into<String>,
        value: impl Into<Value>,
        compare: Option<&str>,
        inclusive: bool,
        column: Option<&str>,
    ) -> Self {
        self.date_relation(Relation::Or)
            .where_date_full(key, value, compare, inclusive, column)
    }

    #[must_use]
    fn or_where_date_map(self, clause: Value) -> Self {
        self.date_relation(Relation::Or).where_date_map(clause)
    }

    #[must_use]
    fn or_where_date_group(self, configure: impl FnOnce(DateQuery) -> DateQuery) -> Self {
        self.date_relation(Relation::Or).where_date_group(configure)
    }

    /// Force the relation on the stored `date_query` group. Works on an empty
    /// group too, leaving a relation-only map for later entries to join.
    #[must_use]
    fn date_relation(mut self, relation: Relation) -> Self {
        let mut group = read_group(self.args(), "date_query");
        group.set_relation(relation);
        write_group(self.args_mut(), "date_query", &group);
        self
    }

    #[must_use]
    fn where_date_before(
        self,
        date: impl Into<Value>,
        inclusive: bool,
        column: Option<&str>,
    ) -> Self {
        self.where_date_full("before", date, None, inclusive, column)
    }

    #[must_use]
    fn or_where_date_before(
        self,
        date: impl Into<Value>,
        inclusive: bool,
        column: Option<&str>,
    ) -> Self {
        self.date_relation(Relation::Or)
            .where_date_before(date, inclusive, column)
    }

    #[must_use]
    fn where_date_after(
        self,
        date: impl Into<Value>,
        inclusive: bool,
        column: Option<&str>,
    ) -> Self {
        self.where_date_full("after", date, None, inclusive, column)
    }

    #[must_use]
    fn or_where_date_after(
        self,
        date: impl Into<Value>,
        inclusive: bool,
        column: Option<&str>,
    ) -> Self {
        self.date_relation(Relation::Or)
            .where_date_after(date, inclusive, column)
    }

    #[must_use]
    fn where_date_between(
        self,
        after: impl Into<Value>,
        before: impl Into<Value>,
        inclusive: bool,
        column: Option<&str>,
    ) -> Self {
        let mut clause = vec![
            ("before".to_string(), before.into()),
            ("after".to_string(), after.into()),
        ];
        if inclusive {
            clause.push(("inclusive".to_string(), Value::Bool(true)));
        }
        if let Some(column) = column
            && !column.is_empty()
        {
            clause.push(("column".to_string(), Value::from(column)));
        }

        self.where_date_map(Value::Map(clause))
    }

    #[must_use]
    fn or_where_date_between(
        self,
        after: impl Into<Value>,
        before: impl Into<Value>,
        inclusive: bool,
        column: Option<&str>,
    ) -> Self {
        self.date_relation(Relation::Or)
            .where_date_between(after, before, inclusive, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Probe {
        args: QueryArgs,
    }

    impl ArgsSlot for Probe {
        fn args(&self) -> &QueryArgs {
            &self.args
        }

        fn args_mut(&mut self) -> &mut QueryArgs {
            &mut self.args
        }
    }

    impl HasWhere for Probe {}
    impl HasMetaClauses for Probe {}
    impl HasDateClauses for Probe {}

    #[test]
    fn where_in_wraps_scalars_and_suffixes_the_key() {
        let probe = Probe::default().where_in("author", 7_i64);
        assert_eq!(
            probe.args().get_key("author__in"),
            Some(&Value::List(vec![Value::Int(7)]))
        );

        let probe = Probe::default().where_not_in("author", vec![1_i64, 2]);
        assert_eq!(
            probe.args().get_key("author__not_in"),
            Some(&Value::List(vec![Value::Int(1), Value::Int(2)]))
        );
    }

    #[test]
    fn where_op_routes_and_rejects() {
        let probe = Probe::default().where_op("author", "!in", 7_i64).unwrap();
        assert!(probe.args().get_key("author__not_in").is_some());

        let probe = Probe::default().where_op("author", "equals", 7_i64).unwrap();
        assert_eq!(probe.args().get_key("author"), Some(&Value::Int(7)));

        let err = Probe::default().where_op("author", "like", 7_i64).unwrap_err();
        assert_eq!(err.to_string(), "invalid argument: unsupported operator \"like\"");
    }

    #[test]
    fn meta_clauses_default_the_relation_when_growing() {
        let probe = Probe::default()
            .where_meta("color", "blue")
            .where_meta("size", "small");

        let group = read_group(probe.args(), "meta_query");
        assert_eq!(group.relation(), Some(Relation::And));
        assert_eq!(group.len(), 2);
    }

    #[test]
    fn or_where_meta_forces_the_relation_after_append() {
        let probe = Probe::default()
            .where_meta("color", "blue")
            .or_where_meta("color", "red");

        let group = read_group(probe.args(), "meta_query");
        assert_eq!(group.relation(), Some(Relation::Or));
    }

    #[test]
    fn meta_exists_omits_the_value() {
        let probe = Probe::default().where_meta_not_exists("color");
        let group = read_group(probe.args(), "meta_query");
        assert_eq!(
            group.entries()[0],
            Value::map([
                ("key", Value::from("color")),
                ("compare", Value::from("NOT EXISTS")),
                ("type", Value::from("CHAR")),
            ])
        );
    }

    #[test]
    fn date_relation_marks_before_the_first_entry() {
        let probe = Probe::default().or_where_date("year", 2020_i64);
        let group = read_group(probe.args(), "date_query");
        assert_eq!(group.relation(), Some(Relation::Or));
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn date_between_puts_before_first_and_trims_defaults() {
        let probe = Probe::default().where_date_between("2020-01-01", "2020-12-31", false, None);
        let group = read_group(probe.args(), "date_query");
        assert_eq!(
            group.entries()[0],
            Value::map([
                ("before", Value::from("2020-12-31")),
                ("after", Value::from("2020-01-01")),
            ])
        );
    }

    #[test]
    fn date_query_overwrites_wholesale() {
        let probe = Probe::default()
            .where_date("year", 2019_i64)
            .date_query(Value::List(vec![]));
        assert_eq!(probe.args().get_key("date_query"), Some(&Value::List(vec![])));
    }
}
