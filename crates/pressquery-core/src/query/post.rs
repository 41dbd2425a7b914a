use crate::{
    args::QueryArgs,
    clause::{ClauseGroup, Relation, TaxQuery, tax_leaf},
    error::Error,
    host::{OptionHost, PostHost},
    query::{ArgsSlot, HasDateClauses, HasMetaClauses, HasWhere},
    response::Response,
    validate::{list_of_ints, list_of_text, text_or_list},
    value::Value,
};
use serde::ser::{Serialize, Serializer};
use std::fmt::Display;

///
/// PostQuery
///
/// Fluent builder for post queries. Chained calls accumulate into an ordered
/// argument map; terminal methods hand the serialized map to a [`PostHost`]
/// and wrap the rows in a [`Response`].
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PostQuery {
    args: QueryArgs,
}

impl PostQuery {
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
    // Post type
    // ------------------------------------------------------------------

    /// Post type name, or a list of names.
    #[must_use]
    pub fn where_post_type(self, name: impl Into<Value>) -> Self {
        self.set("post_type", name)
    }

    /// Restrict to pages.
    #[must_use]
    pub fn where_is_page(self) -> Self {
        self.where_post_type("page")
    }

    // ------------------------------------------------------------------
    // Author
    // ------------------------------------------------------------------

    #[must_use]
    pub fn where_author(self, id: i64) -> Self {
        self.set("author", id)
    }

    /// Filter by the author's nicename.
    #[must_use]
    pub fn where_author_name(self, name: impl Into<String>) -> Self {
        self.set("author_name", name.into())
    }

    pub fn where_author_in(self, ids: impl Into<Value>) -> Result<Self, Error> {
        let ids = list_of_ints(ids, "Author id must be an int or a list of integer ids")?;

        Ok(self.set("author__in", ids))
    }

    pub fn where_author_not_in(self, ids: impl Into<Value>) -> Result<Self, Error> {
        let ids = list_of_ints(ids, "Author id must be an int or a list of integer ids")?;

        Ok(self.set("author__not_in", ids))
    }

    pub fn exclude_authors(self, ids: impl Into<Value>) -> Result<Self, Error> {
        self.where_author_not_in(ids)
    }

    // ------------------------------------------------------------------
    // Category
    // ------------------------------------------------------------------

    #[must_use]
    pub fn where_category_id(self, id: i64) -> Self {
        self.set("cat", id)
    }

    /// Filter by category slug.
    #[must_use]
    pub fn where_category(self, name: impl Into<String>) -> Self {
        self.where_category_name(name)
    }

    #[must_use]
    pub fn where_category_name(self, name: impl Into<String>) -> Self {
        self.set("category_name", name.into())
    }

    /// Posts in all of the given categories.
    pub fn where_category_and(self, ids: impl Into<Value>) -> Result<Self, Error> {
        let ids = list_of_ints(ids, "Category id must be an int or a list of integer ids")?;

        Ok(self.set("category__and", ids))
    }

    pub fn where_category_in(self, ids: impl Into<Value>) -> Result<Self, Error> {
        let ids = list_of_ints(ids, "Category id must be an int or a list of integer ids")?;

        Ok(self.set("category__in", ids))
    }

    pub fn where_category_not_in(self, ids: impl Into<Value>) -> Result<Self, Error> {
        let ids = list_of_ints(ids, "Category id must be an int or a list of integer ids")?;

        Ok(self.set("category__not_in", ids))
    }

    pub fn exclude_categories(self, ids: impl Into<Value>) -> Result<Self, Error> {
        self.where_category_not_in(ids)
    }

    // ------------------------------------------------------------------
    // Tag
    // ------------------------------------------------------------------

    #[must_use]
    pub fn where_tag_id(self, id: i64) -> Self {
        self.set("tag_id", id)
    }

    /// Filter by tag slug.
    #[must_use]
    pub fn where_tag(self, name: impl Into<String>) -> Self {
        self.where_tag_name(name)
    }

    #[must_use]
    pub fn where_tag_name(self, slug: impl Into<String>) -> Self {
        self.set("tag", slug.into())
    }

    pub fn where_tag_and(self, ids: impl Into<Value>) -> Result<Self, Error> {
        let ids = list_of_ints(ids, "Tag id must be an int or a list of integer ids")?;

        Ok(self.set("tag__and", ids))
    }

    pub fn where_tag_in(self, ids: impl Into<Value>) -> Result<Self, Error> {
        let ids = list_of_ints(ids, "Tag id must be an int or a list of integer ids")?;

        Ok(self.set("tag__in", ids))
    }

    pub fn where_tag_not_in(self, ids: impl Into<Value>) -> Result<Self, Error> {
        let ids = list_of_ints(ids, "Tag id must be an int or a list of integer ids")?;

        Ok(self.set("tag__not_in", ids))
    }

    pub fn exclude_by_tag_id(self, ids: impl Into<Value>) -> Result<Self, Error> {
        self.where_tag_not_in(ids)
    }

    pub fn where_tag_slug_and(self, names: impl Into<Value>) -> Result<Self, Error> {
        let names = list_of_text(names, "Tag slug must be a string or a list of strings.")?;

        Ok(self.set("tag_slug__and", names))
    }

    pub fn where_tag_slug_in(self, names: impl Into<Value>) -> Result<Self, Error> {
        let names = list_of_text(names, "Tag slug must be a string or a list of strings.")?;

        Ok(self.set("tag_slug__in", names))
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    #[must_use]
    pub fn search(self, keyword: impl Into<String>) -> Self {
        self.set("s", keyword.into())
    }

    // ------------------------------------------------------------------
    // Password
    // ------------------------------------------------------------------

    /// A text value filters by the exact password; anything else toggles the
    /// has-password flag.
    #[must_use]
    pub fn where_password(self, password: impl Into<Value>) -> Self {
        let password = password.into();
        if password.is_text() {
            self.set("post_password", password)
        } else {
            self.set("has_password", password)
        }
    }

    #[must_use]
    pub fn where_has_password(self, has: bool) -> Self {
        self.where_password(has)
    }

    // ------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------

    pub fn where_status(self, status: impl Into<Value>) -> Result<Self, Error> {
        let status = text_or_list(status, "Status must be a string or a list of strings.")?;

        Ok(self.set("post_status", status))
    }

    #[must_use]
    pub fn where_is_published(self) -> Self {
        self.set("post_status", "publish")
    }

    #[must_use]
    pub fn where_is_pending(self) -> Self {
        self.set("post_status", "pending")
    }

    #[must_use]
    pub fn where_is_draft(self) -> Self {
        self.set("post_status", "draft")
    }

    #[must_use]
    pub fn where_is_in_trash(self) -> Self {
        self.set("post_status", "trash")
    }

    // ------------------------------------------------------------------
    // Comments
    // ------------------------------------------------------------------

    /// Bare count when no compare is given, `{value, compare}` otherwise.
    /// The compare is stored verbatim.
    #[must_use]
    pub fn where_comment_count(self, count: i64, compare: Option<&str>) -> Self {
        let value = match compare {
            None => Value::Int(count),
            Some(compare) => Value::map([
                ("value", Value::Int(count)),
                ("compare", Value::from(compare)),
            ]),
        };

        self.set("comment_count", value)
    }

    // ------------------------------------------------------------------
    // Post & page
    // ------------------------------------------------------------------

    #[must_use]
    pub fn where_post_id(self, id: i64) -> Self {
        self.set("p", id)
    }

    pub fn where_post_in(self, ids: impl Into<Value>) -> Result<Self, Error> {
        let ids = list_of_ints(ids, "Post id must be an integer or a list of integers.")?;

        Ok(self.set("post__in", ids))
    }

    pub fn where_post_not_in(self, ids: impl Into<Value>) -> Result<Self, Error> {
        let ids = list_of_ints(ids, "Post id must be an integer or a list of integers.")?;

        Ok(self.set("post__not_in", ids))
    }

    /// Filter by post slug.
    #[must_use]
    pub fn where_name(self, name: impl Into<String>) -> Self {
        self.set("name", name.into())
    }

    #[must_use]
    pub fn where_post_name(self, name: impl Into<String>) -> Self {
        self.where_name(name)
    }

    #[must_use]
    pub fn where_post_slug(self, name: impl Into<String>) -> Self {
        self.where_name(name)
    }

    pub fn where_post_name_in(self, names: impl Into<Value>) -> Result<Self, Error> {
        let names = list_of_text(names, "Post name must be a string or a list of strings.")?;

        Ok(self.set("post_name__in", names))
    }

    pub fn where_post_slug_in(self, names: impl Into<Value>) -> Result<Self, Error> {
        let names = list_of_text(names, "Post slug must be a string or a list of strings.")?;

        Ok(self.set("post_name__in", names))
    }

    #[must_use]
    pub fn where_page_id(self, id: i64) -> Self {
        self.set("page_id", id)
    }

    #[must_use]
    pub fn where_page_name(self, slug: impl Into<String>) -> Self {
        self.set("pagename", slug.into())
    }

    #[must_use]
    pub fn where_page(self, slug: impl Into<String>) -> Self {
        self.where_page_name(slug)
    }

    #[must_use]
    pub fn where_page_slug(self, slug: impl Into<String>) -> Self {
        self.where_page_name(slug)
    }

    /// Children of a specific post.
    #[must_use]
    pub fn where_parent(self, id: i64) -> Self {
        self.set("post_parent", id)
    }

    pub fn where_parent_in(self, ids: impl Into<Value>) -> Result<Self, Error> {
        let ids = list_of_ints(ids, "Post parent ID must be an int or a list of integers.")?;

        Ok(self.set("post_parent__in", ids))
    }

    pub fn where_parent_not_in(self, ids: impl Into<Value>) -> Result<Self, Error> {
        let ids = list_of_ints(
            ids,
            "Excluded post parent ID must be an int or a list of integers.",
        )?;

        Ok(self.set("post_parent__not_in", ids))
    }

    // ------------------------------------------------------------------
    // Pagination
    // ------------------------------------------------------------------

    #[must_use]
    pub fn paginate(self, per_page: i64, paged: i64) -> Self {
        self.posts_per_page(per_page).paged(paged)
    }

    #[must_use]
    pub fn nopaging(self, nopaging: bool) -> Self {
        self.set("nopaging", nopaging)
    }

    /// `-1` shows everything; the offset is ignored in that case.
    #[must_use]
    pub fn posts_per_page(self, count: i64) -> Self {
        self.set("posts_per_page", count)
    }

    #[must_use]
    pub fn limit(self, count: i64) -> Self {
        self.posts_per_page(count)
    }

    #[must_use]
    pub fn posts_per_archive_page(self, count: i64) -> Self {
        self.set("posts_per_archive_page", count)
    }

    #[must_use]
    pub fn offset(self, count: i64) -> Self {
        self.set("offset", count)
    }

    #[must_use]
    pub fn skip(self, count: i64) -> Self {
        self.offset(count)
    }

    #[must_use]
    pub fn paged(self, count: i64) -> Self {
        self.set("paged", count)
    }

    /// Page number for a static front page.
    #[must_use]
    pub fn page(self, count: i64) -> Self {
        self.set("page", count)
    }

    /// Restrict to (or exclude) the sticky posts recorded in the host's
    /// `sticky_posts` option.
    pub fn where_sticky(self, host: &impl OptionHost, sticky: bool) -> Result<Self, Error> {
        let ids = host
            .get_option("sticky_posts")
            .unwrap_or_else(|| Value::List(Vec::new()));

        if sticky {
            self.where_post_in(ids)
        } else {
            self.where_post_not_in(ids)
        }
    }

    pub fn exclude_sticky_posts(self, host: &impl OptionHost) -> Result<Self, Error> {
        self.where_sticky(host, false)
    }

    #[must_use]
    pub fn ignore_sticky_posts(self, ignore: bool) -> Self {
        self.set("ignore_sticky_posts", ignore)
    }

    #[must_use]
    pub fn ignore_stickiness(self) -> Self {
        self.ignore_sticky_posts(true)
    }

    // ------------------------------------------------------------------
    // Order
    // ------------------------------------------------------------------

    /// Sort direction, upper-cased on the way in.
    #[must_use]
    pub fn order(self, order: &str) -> Self {
        self.set("order", order.to_uppercase())
    }

    #[must_use]
    pub fn order_asc(self) -> Self {
        self.order("asc")
    }

    #[must_use]
    pub fn order_desc(self) -> Self {
        self.order("desc")
    }

    /// Sort field plus direction. Accepts a single field name or a
    /// `{field: direction}` map.
    #[must_use]
    pub fn order_by(self, orderby: impl Into<Value>, order: &str) -> Self {
        self.set("orderby", orderby).order(order)
    }

    #[must_use]
    pub fn order_by_id(self, order: &str) -> Self {
        self.order_by("ID", order)
    }

    #[must_use]
    pub fn order_by_author(self, order: &str) -> Self {
        self.order_by("author", order)
    }

    #[must_use]
    pub fn order_by_title(self, order: &str) -> Self {
        self.order_by("title", order)
    }

    #[must_use]
    pub fn order_by_name(self, order: &str) -> Self {
        self.order_by("name", order)
    }

    #[must_use]
    pub fn order_by_slug(self, order: &str) -> Self {
        self.order_by_name(order)
    }

    #[must_use]
    pub fn order_by_type(self, order: &str) -> Self {
        self.order_by("type", order)
    }

    #[must_use]
    pub fn order_by_date(self, order: &str) -> Self {
        self.order_by("date", order)
    }

    #[must_use]
    pub fn order_by_date_modified(self, order: &str) -> Self {
        self.order_by("modified", order)
    }

    #[must_use]
    pub fn order_by_parent(self, order: &str) -> Self {
        self.order_by("parent", order)
    }

    #[must_use]
    pub fn order_random(self) -> Self {
        self.order_by("rand", "desc")
    }

    #[must_use]
    pub fn order_by_comment_count(self, order: &str) -> Self {
        self.order_by("comment_count", order)
    }

    #[must_use]
    pub fn order_by_relevance(self, order: &str) -> Self {
        self.order_by("relevance", order)
    }

    #[must_use]
    pub fn order_by_menu_order(self, order: &str) -> Self {
        self.order_by("menu_order", order)
    }

    /// Numeric sort on a meta value; also pins the meta key.
    #[must_use]
    pub fn order_by_meta_value_num(self, key: impl Into<String>, order: &str) -> Self {
        self.order_by("meta_value_num", order).set("meta_key", key.into())
    }

    // ------------------------------------------------------------------
    // Date number filters
    // ------------------------------------------------------------------

    /// 4 digit year, e.g. 2022.
    pub fn where_year(self, year: i64) -> Result<Self, Error> {
        if !(1000..=9999).contains(&year) {
            return Err(Error::invalid_argument(
                "Year parameter must be in a 4 digit format.",
            ));
        }

        Ok(self.set("year", year))
    }

    pub fn where_month_number(self, month: i64) -> Result<Self, Error> {
        if !(1..=12).contains(&month) {
            return Err(Error::invalid_argument(
                "Month number parameter must be a number from 1-12.",
            ));
        }

        Ok(self.set("monthnum", month))
    }

    /// Week of the year, as counted by the host engine.
    pub fn where_week(self, week: i64) -> Result<Self, Error> {
        if !(0..=53).contains(&week) {
            return Err(Error::invalid_argument(
                "Week number parameter must be a number from 0 to 53.",
            ));
        }

        Ok(self.set("w", week))
    }

    pub fn where_day(self, day: i64) -> Result<Self, Error> {
        if !(1..=31).contains(&day) {
            return Err(Error::invalid_argument(
                "Day number parameter must be a number from 1 to 31.",
            ));
        }

        Ok(self.set("day", day))
    }

    pub fn where_hour(self, hour: i64) -> Result<Self, Error> {
        if !(0..=23).contains(&hour) {
            return Err(Error::invalid_argument(
                "Hour number parameter must be a number from 0 to 23",
            ));
        }

        Ok(self.set("hour", hour))
    }

    pub fn where_minute(self, minute: i64) -> Result<Self, Error> {
        if !(0..=60).contains(&minute) {
            return Err(Error::invalid_argument(
                "Minute number parameter must be a number from 0 to 60",
            ));
        }

        Ok(self.set("minute", minute))
    }

    pub fn where_second(self, second: i64) -> Result<Self, Error> {
        if !(0..=60).contains(&second) {
            return Err(Error::invalid_argument(
                "Second number parameter must be a number from 0 to 60",
            ));
        }

        Ok(self.set("second", second))
    }

    /// Combined year and month, e.g. 201307.
    pub fn where_year_month(self, year_month: i64) -> Result<Self, Error> {
        if !(100_000..=999_999).contains(&year_month) {
            return Err(Error::invalid_argument(
                "YearMonth parameter must be in a 6 digit format (For e.g.: 201307).",
            ));
        }

        Ok(self.set("m", year_month))
    }

    // ------------------------------------------------------------------
    // Custom field shortcuts
    // ------------------------------------------------------------------

    /// Single meta key filter via the flat `meta_key` / `meta_value`
    /// arguments. The compare is stored verbatim.
    #[must_use]
    pub fn where_meta_key(
        self,
        key: impl Into<String>,
        value: impl Into<Value>,
        compare: Option<&str>,
    ) -> Self {
        let query = match compare {
            Some(compare) => self.set("meta_compare", compare),
            None => self,
        };

        query.set("meta_key", key.into()).set("meta_value", value)
    }

    /// Meta value filter regardless of key.
    #[must_use]
    pub fn where_meta_value(self, value: impl Into<Value>) -> Self {
        self.set("meta_value", value)
    }

    /// Meta value of literal zero, regardless of key.
    #[must_use]
    pub fn where_meta_zero_value(self) -> Self {
        self.set("meta_value", "_wp_zero_value")
    }

    // ------------------------------------------------------------------
    // Permission & caching
    // ------------------------------------------------------------------

    /// Only posts the current user has the capability for.
    #[must_use]
    pub fn user_permission(self, perm: impl Into<String>) -> Self {
        self.set("perm", perm.into())
    }

    #[must_use]
    pub fn cache_results(self, cache: bool) -> Self {
        self.set("cache_results", cache)
    }

    #[must_use]
    pub fn update_post_meta_cache(self, update: bool) -> Self {
        self.set("update_post_meta_cache", update)
    }

    #[must_use]
    pub fn update_post_term_cache(self, update: bool) -> Self {
        self.set("update_post_term_cache", update)
    }

    // ------------------------------------------------------------------
    // Taxonomy
    // ------------------------------------------------------------------

    /// Append one taxonomy clause to the `tax_query` group. When the group
    /// already holds entries without a relation, it defaults to `AND` first.
    #[must_use]
    pub fn where_tax(
        mut self,
        taxonomy: impl Into<String>,
        field: Option<&str>,
        terms: impl Into<Value>,
        operator: &str,
        children: bool,
    ) -> Self {
        let mut group = self.tax_group();
        group.default_relation_when_growing();
        group.push(tax_leaf(taxonomy, field, terms.into(), operator, children));
        self.args.set("tax_query", group.to_value());
        self
    }

    /// Configure a [`TaxQuery`] sub-builder and append its serialized group
    /// as a single nested entry.
    #[must_use]
    pub fn where_tax_group(mut self, configure: impl FnOnce(TaxQuery) -> TaxQuery) -> Self {
        let child = configure(TaxQuery::new());
        let mut group = self.tax_group();
        group.default_relation_when_growing();
        group.push(child.to_value());
        self.args.set("tax_query", group.to_value());
        self
    }

    #[must_use]
    pub fn and_where_tax(
        self,
        taxonomy: impl Into<String>,
        field: Option<&str>,
        terms: impl Into<Value>,
        operator: &str,
        children: bool,
    ) -> Self {
        self.where_tax(taxonomy, field, terms, operator, children)
    }

    #[must_use]
    pub fn or_where_tax(
        self,
        taxonomy: impl Into<String>,
        field: Option<&str>,
        terms: impl Into<Value>,
        operator: &str,
        children: bool,
    ) -> Self {
        self.where_tax(taxonomy, field, terms, operator, children)
            .tax_relation(Relation::Or)
    }

    /// Force the relation on the stored `tax_query` group.
    #[must_use]
    pub fn tax_relation(mut self, relation: Relation) -> Self {
        let mut group = self.tax_group();
        group.set_relation(relation);
        self.args.set("tax_query", group.to_value());
        self
    }

    fn tax_group(&self) -> ClauseGroup {
        self.args
            .get_key("tax_query")
            .cloned()
            .map_or_else(ClauseGroup::new, ClauseGroup::from_value)
    }

    #[must_use]
    pub fn where_term_id(
        self,
        taxonomy: impl Into<String>,
        ids: impl Into<Value>,
        operator: &str,
        children: bool,
    ) -> Self {
        self.where_tax(taxonomy, Some("term_id"), ids, operator, children)
    }

    #[must_use]
    pub fn and_where_term_id(
        self,
        taxonomy: impl Into<String>,
        ids: impl Into<Value>,
        operator: &str,
        children: bool,
    ) -> Self {
        self.and_where_tax(taxonomy, Some("term_id"), ids, operator, children)
    }

    #[must_use]
    pub fn or_where_term_id(
        self,
        taxonomy: impl Into<String>,
        ids: impl Into<Value>,
        operator: &str,
        children: bool,
    ) -> Self {
        self.or_where_tax(taxonomy, Some("term_id"), ids, operator, children)
    }

    #[must_use]
    pub fn where_term_slug(
        self,
        taxonomy: impl Into<String>,
        names: impl Into<Value>,
        operator: &str,
        children: bool,
    ) -> Self {
        self.where_tax(taxonomy, Some("slug"), names, operator, children)
    }

    #[must_use]
    pub fn and_where_term_slug(
        self,
        taxonomy: impl Into<String>,
        names: impl Into<Value>,
        operator: &str,
        children: bool,
    ) -> Self {
        self.and_where_tax(taxonomy, Some("slug"), names, operator, children)
    }

    #[must_use]
    pub fn or_where_term_slug(
        self,
        taxonomy: impl Into<String>,
        names: impl Into<Value>,
        operator: &str,
        children: bool,
    ) -> Self {
        self.or_where_tax(taxonomy, Some("slug"), names, operator, children)
    }

    #[must_use]
    pub fn where_term_name(
        self,
        taxonomy: impl Into<String>,
        names: impl Into<Value>,
        operator: &str,
        children: bool,
    ) -> Self {
        self.where_tax(taxonomy, Some("name"), names, operator, children)
    }

    #[must_use]
    pub fn and_where_term_name(
        self,
        taxonomy: impl Into<String>,
        names: impl Into<Value>,
        operator: &str,
        children: bool,
    ) -> Self {
        self.and_where_tax(taxonomy, Some("name"), names, operator, children)
    }

    #[must_use]
    pub fn or_where_term_name(
        self,
        taxonomy: impl Into<String>,
        names: impl Into<Value>,
        operator: &str,
        children: bool,
    ) -> Self {
        self.or_where_tax(taxonomy, Some("name"), names, operator, children)
    }

    #[must_use]
    pub fn where_term_tax_id(
        self,
        taxonomy: impl Into<String>,
        ids: impl Into<Value>,
        operator: &str,
        children: bool,
    ) -> Self {
        self.where_tax(taxonomy, Some("term_taxonomy_id"), ids, operator, children)
    }

    #[must_use]
    pub fn and_where_term_tax_id(
        self,
        taxonomy: impl Into<String>,
        ids: impl Into<Value>,
        operator: &str,
        children: bool,
    ) -> Self {
        self.and_where_tax(taxonomy, Some("term_taxonomy_id"), ids, operator, children)
    }

    #[must_use]
    pub fn or_where_term_tax_id(
        self,
        taxonomy: impl Into<String>,
        ids: impl Into<Value>,
        operator: &str,
        children: bool,
    ) -> Self {
        self.or_where_tax(taxonomy, Some("term_taxonomy_id"), ids, operator, children)
    }

    // ------------------------------------------------------------------
    // Mime types
    // ------------------------------------------------------------------

    /// A single type, a list of types, or a `{label: mime}` map.
    pub fn where_mime_type(self, mimes: impl Into<Value>) -> Result<Self, Error> {
        let mimes = mimes.into();
        let valid = match &mimes {
            Value::Text(_) => true,
            Value::List(items) => items.iter().all(Value::is_text),
            Value::Map(entries) => entries.iter().all(|(_, mime)| mime.is_text()),
            _ => false,
        };

        if !valid {
            return Err(Error::invalid_argument(
                "Mime type must be a string or a list of strings.",
            ));
        }

        Ok(self.set("post_mime_type", mimes))
    }

    /// Every allowed mime type except images.
    pub fn where_not_image(self, host: &impl PostHost) -> Result<Self, Error> {
        let mimes = match host.allowed_mime_types() {
            Value::Map(entries) => entries
                .into_iter()
                .filter(|(_, mime)| {
                    !mime.as_text().is_some_and(|mime| mime.starts_with("image"))
                })
                .collect(),
            _ => Vec::new(),
        };

        self.where_mime_type(Value::Map(mimes))
    }

    pub fn exclude_images(self, host: &impl PostHost) -> Result<Self, Error> {
        self.where_not_image(host)
    }

    // ------------------------------------------------------------------
    // Return fields
    // ------------------------------------------------------------------

    pub fn fields(self, fields: &str) -> Result<Self, Error> {
        if fields != "ids" && fields != "all" {
            return Err(Error::invalid_argument(format!(
                "Fields argument \"{fields}\" is not supported. Supported: \"all\" or \"ids\"."
            )));
        }

        Ok(self.set("fields", fields))
    }

    #[must_use]
    pub fn return_all_fields(self) -> Self {
        self.set("fields", "all")
    }

    #[must_use]
    pub fn return_ids(self) -> Self {
        self.set("fields", "ids")
    }

    #[must_use]
    pub fn suppress_filters(self, suppress: bool) -> Self {
        self.set("suppress_filters", suppress)
    }

    // ------------------------------------------------------------------
    // Terminal methods
    // ------------------------------------------------------------------

    /// Run the query against the host.
    pub fn get(&self, host: &impl PostHost) -> Result<Response, Error> {
        let rows = host.get_posts(&self.to_value())?;

        Ok(Response::new(rows))
    }

    /// Run the query and convert each row into `T`.
    pub fn get_as<T>(&self, host: &impl PostHost) -> Result<Response<T>, Error>
    where
        T: TryFrom<Value>,
        T::Error: Display,
    {
        self.get(host)?.map_into()
    }

    /// Run the query without a page size limit.
    pub fn all(&mut self, host: &impl PostHost) -> Result<Response, Error> {
        self.args.set("posts_per_page", Value::Int(-1));
        self.get(host)
    }

    pub fn all_as<T>(&mut self, host: &impl PostHost) -> Result<Response<T>, Error>
    where
        T: TryFrom<Value>,
        T::Error: Display,
    {
        self.all(host)?.map_into()
    }

    /// First matching row in ascending order.
    pub fn first_of_all(&mut self, host: &impl PostHost) -> Result<Value, Error> {
        self.args.set("order", Value::from("ASC"));
        self.args.set("posts_per_page", Value::Int(1));
        self.get(host)?
            .into_first()
            .ok_or_else(|| Error::not_found("no post found"))
    }

    pub fn first_of_all_as<T>(&mut self, host: &impl PostHost) -> Result<T, Error>
    where
        T: TryFrom<Value>,
        T::Error: Display,
    {
        let row = self.first_of_all(host)?;
        T::try_from(row).map_err(|err| Error::Convert(err.to_string()))
    }

    /// Last matching row, via a descending single-row query.
    pub fn last_of_all(&mut self, host: &impl PostHost) -> Result<Value, Error> {
        self.args.set("order", Value::from("DESC"));
        self.args.set("posts_per_page", Value::Int(1));
        self.get(host)?
            .into_first()
            .ok_or_else(|| Error::not_found("no post found"))
    }

    pub fn last_of_all_as<T>(&mut self, host: &impl PostHost) -> Result<T, Error>
    where
        T: TryFrom<Value>,
        T::Error: Display,
    {
        let row = self.last_of_all(host)?;
        T::try_from(row).map_err(|err| Error::Convert(err.to_string()))
    }
}

impl ArgsSlot for PostQuery {
    fn args(&self) -> &QueryArgs {
        &self.args
    }

    fn args_mut(&mut self) -> &mut QueryArgs {
        &mut self.args
    }
}

impl HasWhere for PostQuery {}
impl HasMetaClauses for PostQuery {}
impl HasDateClauses for PostQuery {}

impl TryFrom<Value> for PostQuery {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Ok(Self {
            args: QueryArgs::try_from(value)?,
        })
    }
}

impl Serialize for PostQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.args.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostError;

    struct StubHost {
        rows: Vec<Value>,
    }

    impl PostHost for StubHost {
        fn get_posts(&self, _args: &Value) -> Result<Vec<Value>, HostError> {
            Ok(self.rows.clone())
        }

        fn allowed_mime_types(&self) -> Value {
            Value::map([
                ("jpg|jpeg", Value::from("image/jpeg")),
                ("pdf", Value::from("application/pdf")),
                ("mp4", Value::from("video/mp4")),
            ])
        }
    }

    struct Options;

    impl OptionHost for Options {
        fn get_option(&self, name: &str) -> Option<Value> {
            (name == "sticky_posts").then(|| Value::from(vec![3_i64, 9]))
        }
    }

    #[test]
    fn author_filters_use_suffixed_keys() {
        let q = PostQuery::new()
            .where_author(5)
            .where_author_in(vec![1_i64, 2])
            .unwrap();

        assert_eq!(q.args().get_key("author"), Some(&Value::Int(5)));
        assert_eq!(
            q.args().get_key("author__in"),
            Some(&Value::List(vec![Value::Int(1), Value::Int(2)]))
        );
    }

    #[test]
    fn scalar_ids_are_wrapped_and_validated() {
        let q = PostQuery::new().where_post_in(7_i64).unwrap();
        assert_eq!(
            q.args().get_key("post__in"),
            Some(&Value::List(vec![Value::Int(7)]))
        );

        let err = PostQuery::new().where_post_in("seven").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid argument: Post id must be an integer or a list of integers."
        );
    }

    #[test]
    fn password_routes_on_value_shape() {
        let q = PostQuery::new().where_password("secret");
        assert_eq!(q.args().get_key("post_password"), Some(&Value::from("secret")));

        let q = PostQuery::new().where_has_password(true);
        assert_eq!(q.args().get_key("has_password"), Some(&Value::Bool(true)));
    }

    #[test]
    fn comment_count_with_compare_builds_a_map() {
        let q = PostQuery::new().where_comment_count(10, Some(">="));
        assert_eq!(
            q.args().get_key("comment_count"),
            Some(&Value::map([
                ("value", Value::Int(10)),
                ("compare", Value::from(">=")),
            ]))
        );

        let q = PostQuery::new().where_comment_count(10, None);
        assert_eq!(q.args().get_key("comment_count"), Some(&Value::Int(10)));
    }

    #[test]
    fn order_by_sets_both_keys_upper_casing_the_direction() {
        let q = PostQuery::new().order_by_title("asc");
        assert_eq!(q.args().get_key("orderby"), Some(&Value::from("title")));
        assert_eq!(q.args().get_key("order"), Some(&Value::from("ASC")));
    }

    #[test]
    fn year_rejects_non_four_digit_values() {
        assert!(PostQuery::new().where_year(2022).is_ok());

        let err = PostQuery::new().where_year(99).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid argument: Year parameter must be in a 4 digit format."
        );
    }

    #[test]
    fn tax_clauses_group_under_tax_query() {
        let q = PostQuery::new().where_term_slug("people", "bob", "in", true);
        let Some(Value::List(entries)) = q.args().get_key("tax_query") else {
            panic!("expected a plain list");
        };
        assert_eq!(entries[0].get("taxonomy"), Some(&Value::from("people")));
        assert_eq!(entries[0].get("operator"), Some(&Value::from("IN")));
    }

    #[test]
    fn or_where_tax_marks_the_relation_after_append() {
        let q = PostQuery::new()
            .where_term_slug("people", "bob", "in", true)
            .or_where_term_slug("people", "alice", "in", true);

        let group = q.tax_group();
        assert_eq!(group.relation(), Some(Relation::Or));
        assert_eq!(group.len(), 2);
    }

    #[test]
    fn sticky_ids_come_from_the_option_store() {
        let q = PostQuery::new().where_sticky(&Options, true).unwrap();
        assert_eq!(
            q.args().get_key("post__in"),
            Some(&Value::List(vec![Value::Int(3), Value::Int(9)]))
        );

        let q = PostQuery::new().exclude_sticky_posts(&Options).unwrap();
        assert!(q.args().get_key("post__not_in").is_some());
    }

    #[test]
    fn not_image_filters_the_host_mime_registry() {
        let host = StubHost { rows: Vec::new() };
        let q = PostQuery::new().where_not_image(&host).unwrap();
        assert_eq!(
            q.args().get_key("post_mime_type"),
            Some(&Value::map([
                ("pdf", Value::from("application/pdf")),
                ("mp4", Value::from("video/mp4")),
            ]))
        );
    }

    #[test]
    fn fields_rejects_unknown_arguments() {
        let err = PostQuery::new().fields("titles").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid argument: Fields argument \"titles\" is not supported. Supported: \"all\" or \"ids\"."
        );
    }

    #[test]
    fn first_of_all_orders_ascending_and_errors_when_empty() {
        let host = StubHost { rows: Vec::new() };
        let err = PostQuery::new().first_of_all(&host).unwrap_err();
        assert_eq!(err.to_string(), "not found: no post found");

        let host = StubHost {
            rows: vec![Value::Int(1), Value::Int(2)],
        };
        let mut q = PostQuery::new();
        assert_eq!(q.first_of_all(&host).unwrap(), Value::Int(1));
        assert_eq!(q.args().get_key("order"), Some(&Value::from("ASC")));
        assert_eq!(q.args().get_key("posts_per_page"), Some(&Value::Int(1)));
    }

    #[test]
    fn all_drops_the_page_size_limit() {
        let host = StubHost { rows: Vec::new() };
        let mut q = PostQuery::new().limit(10);
        q.all(&host).unwrap();
        assert_eq!(q.args().get_key("posts_per_page"), Some(&Value::Int(-1)));
    }
}
