use crate::{
    args::QueryArgs,
    compare::normalize_compare,
    error::Error,
    host::TermHost,
    query::{ArgsSlot, HasMetaClauses, HasWhere},
    response::Response,
    validate::{int_or_list, text_or_list},
    value::Value,
};
use serde::ser::{Serialize, Serializer};
use std::fmt::Display;

///
/// TermQuery
///
/// Fluent builder for taxonomy term queries, executed against a [`TermHost`].
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TermQuery {
    args: QueryArgs,
}

impl TermQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_args(args: QueryArgs) -> Self {
        Self { args }
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        self.args.to_value()
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.args.into_value()
    }

    // ------------------------------------------------------------------
    // Scope
    // ------------------------------------------------------------------

    /// Taxonomy name, or a list of names.
    pub fn where_taxonomy(self, taxonomy: impl Into<Value>) -> Result<Self, Error> {
        let taxonomy = text_or_list(taxonomy, "Taxonomy must be a string or a list of strings.")?;

        Ok(self.set("taxonomy", taxonomy))
    }

    /// Object id(s) the terms must be attached to.
    pub fn where_object_ids(self, ids: impl Into<Value>) -> Result<Self, Error> {
        let ids = int_or_list(
            ids,
            "The method parameter must be an integer or a list of integers.",
        )?;

        Ok(self.set("object_ids", ids))
    }

    // ------------------------------------------------------------------
    // Order
    // ------------------------------------------------------------------

    #[must_use]
    pub fn order(self, order: &str) -> Self {
        self.set("order", order.to_uppercase())
    }

    #[must_use]
    pub fn order_desc(self) -> Self {
        self.set("order", "DESC")
    }

    #[must_use]
    pub fn order_by(self, field: impl Into<String>, order: &str) -> Self {
        self.set("orderby", field.into()).order(order)
    }

    #[must_use]
    pub fn order_by_id(self, order: &str) -> Self {
        self.order_by("id", order)
    }

    #[must_use]
    pub fn order_by_term_id(self, order: &str) -> Self {
        self.order_by("term_id", order)
    }

    #[must_use]
    pub fn order_by_name(self, order: &str) -> Self {
        self.order_by("name", order)
    }

    #[must_use]
    pub fn order_by_slug(self, order: &str) -> Self {
        self.order_by("slug", order)
    }

    /// Order by the number of objects associated with the term.
    #[must_use]
    pub fn order_by_term_count(self, order: &str) -> Self {
        self.order_by("count", order)
    }

    #[must_use]
    pub fn order_by_parent(self, order: &str) -> Self {
        self.order_by("parent", order)
    }

    /// Historical accident kept for compatibility: sorts by `parent`, not by
    /// the order of the `include` list.
    #[must_use]
    pub fn order_by_include(self, order: &str) -> Self {
        self.order_by("parent", order)
    }

    /// Match the order of the `slug__in` list.
    #[must_use]
    pub fn order_by_slug_in(self, order: &str) -> Self {
        self.order_by("slug__in", order)
    }

    #[must_use]
    pub fn order_by_meta_value(self, order: &str) -> Self {
        self.order_by("meta_value", order)
    }

    #[must_use]
    pub fn order_by_meta_value_num(self, order: &str) -> Self {
        self.order_by("meta_value_num", order)
    }

    // ------------------------------------------------------------------
    // Inclusion & exclusion
    // ------------------------------------------------------------------

    #[must_use]
    pub fn hide_empty(self, hide: bool) -> Self {
        self.set("hide_empty", hide)
    }

    pub fn include_terms(self, ids: impl Into<Value>) -> Result<Self, Error> {
        let ids = int_or_list(
            ids,
            "The method parameter must be an integer or a list of integers.",
        )?;

        Ok(self.set("include", ids))
    }

    pub fn where_id_in(self, ids: impl Into<Value>) -> Result<Self, Error> {
        let ids = int_or_list(ids, "Term ID must be an integer or a list of integers.")?;

        Ok(self.set("include", ids))
    }

    pub fn exclude_terms(self, ids: impl Into<Value>) -> Result<Self, Error> {
        let ids = int_or_list(
            ids,
            "Excluded term ID must be an integer or a list of integers.",
        )?;

        Ok(self.set("exclude", ids))
    }

    pub fn where_id_not_in(self, ids: impl Into<Value>) -> Result<Self, Error> {
        self.exclude_terms(ids)
    }

    /// Exclude the given terms along with all their descendants.
    pub fn exclude_tree(self, ids: impl Into<Value>) -> Result<Self, Error> {
        let ids = int_or_list(ids, "Excluded ID must be an integer or a list of integers.")?;

        Ok(self.set("exclude_tree", ids))
    }

    // ------------------------------------------------------------------
    // Pagination
    // ------------------------------------------------------------------

    #[must_use]
    pub fn limit(self, limit: i64) -> Self {
        self.set("number", limit)
    }

    #[must_use]
    pub fn offset(self, offset: i64) -> Self {
        self.set("offset", offset)
    }

    #[must_use]
    pub fn skip(self, offset: i64) -> Self {
        self.offset(offset)
    }

    // ------------------------------------------------------------------
    // Filters
    // ------------------------------------------------------------------

    /// Term fields to query for, passed through to the host untouched.
    #[must_use]
    pub fn fields(self, fields: impl Into<String>) -> Self {
        self.set("fields", fields.into())
    }

    pub fn where_name(self, name: impl Into<Value>) -> Result<Self, Error> {
        let name = text_or_list(name, "Term name must be a string or a list of strings.")?;

        Ok(self.set("name", name))
    }

    pub fn where_slug(self, slug: impl Into<Value>) -> Result<Self, Error> {
        let slug = text_or_list(slug, "Term slug must be a string or a list of strings.")?;

        Ok(self.set("slug", slug))
    }

    pub fn where_term_taxonomy_id(self, ids: impl Into<Value>) -> Result<Self, Error> {
        let ids = int_or_list(
            ids,
            "Term taxonomy ID must be an integer or a list of integers.",
        )?;

        Ok(self.set("term_taxonomy_id", ids))
    }

    /// Include terms that have non-empty descendants, even when hiding empty
    /// terms.
    #[must_use]
    pub fn where_hierarchical(self, hierarchical: bool) -> Self {
        self.set("hierarchical", hierarchical)
    }

    /// Search criteria; the host wraps it in wildcards.
    #[must_use]
    pub fn search(self, search: impl Into<String>) -> Self {
        self.set("search", search.into())
    }

    #[must_use]
    pub fn where_name_like(self, search: impl Into<String>) -> Self {
        self.set("name__like", search.into())
    }

    #[must_use]
    pub fn where_description_like(self, search: impl Into<String>) -> Self {
        self.set("description__like", search.into())
    }

    /// Pad the term counts with those of their children.
    #[must_use]
    pub fn pad_counts(self, counts: bool) -> Self {
        self.set("pad_counts", counts)
    }

    /// All descendants of the given term.
    #[must_use]
    pub fn where_child_of(self, id: i64) -> Self {
        self.set("child_of", id)
    }

    /// Direct children only.
    #[must_use]
    pub fn where_parent(self, id: i64) -> Self {
        self.set("parent", id)
    }

    #[must_use]
    pub fn where_childless(self, childless: bool) -> Self {
        self.set("childless", childless)
    }

    // ------------------------------------------------------------------
    // Caching
    // ------------------------------------------------------------------

    #[must_use]
    pub fn cache_domain(self, domain: impl Into<String>) -> Self {
        self.set("cache_domain", domain.into())
    }

    #[must_use]
    pub fn update_term_meta_cache(self, cache: bool) -> Self {
        self.set("update_term_meta_cache", cache)
    }

    // ------------------------------------------------------------------
    // Flat meta filters
    // ------------------------------------------------------------------

    pub fn where_meta_value(self, value: impl Into<Value>) -> Result<Self, Error> {
        let value = text_or_list(value, "Meta value must be a string or a list of strings.")?;

        Ok(self.set("meta_value", value))
    }

    pub fn where_meta_key(self, key: impl Into<Value>) -> Result<Self, Error> {
        let key = text_or_list(key, "Meta key must be a string or a list of strings.")?;

        Ok(self.set("meta_key", key))
    }

    /// Compare operator for the meta value, normalized on the way in.
    #[must_use]
    pub fn meta_compare(self, operator: &str) -> Self {
        self.set("meta_compare", normalize_compare(operator))
    }

    /// Compare operator for the meta key, normalized on the way in.
    #[must_use]
    pub fn meta_compare_key(self, operator: &str) -> Self {
        self.set("meta_compare_key", normalize_compare(operator))
    }

    /// Cast type for the meta value column, passed through untouched.
    #[must_use]
    pub fn meta_type(self, cast: impl Into<String>) -> Self {
        self.set("meta_type", cast.into())
    }

    #[must_use]
    pub fn meta_type_key(self, cast: impl Into<String>) -> Self {
        self.set("meta_type_key", cast.into())
    }

    // ------------------------------------------------------------------
    // Terminal methods
    // ------------------------------------------------------------------

    /// Count the matching terms without fetching them.
    pub fn count(&self, host: &impl TermHost) -> Result<u64, Error> {
        Ok(host.count_terms(&self.to_value())?)
    }

    /// Run the query against the host.
    pub fn get(&self, host: &impl TermHost) -> Result<Response, Error> {
        let rows = host.get_terms(&self.to_value())?;

        Ok(Response::new(rows))
    }

    /// Run the query and convert each row into `T`.
    pub fn get_as<T>(&self, host: &impl TermHost) -> Result<Response<T>, Error>
    where
        T: TryFrom<Value>,
        T::Error: Display,
    {
        self.get(host)?.map_into()
    }
}

impl ArgsSlot for TermQuery {
    fn args(&self) -> &QueryArgs {
        &self.args
    }

    fn args_mut(&mut self) -> &mut QueryArgs {
        &mut self.args
    }
}

impl HasWhere for TermQuery {}
impl HasMetaClauses for TermQuery {}

impl TryFrom<Value> for TermQuery {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Ok(Self {
            args: QueryArgs::try_from(value)?,
        })
    }
}

impl Serialize for TermQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.args.serialize(serializer)
    }
}
