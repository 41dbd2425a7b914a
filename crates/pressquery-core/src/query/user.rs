use crate::{
    args::QueryArgs,
    error::Error,
    host::UserHost,
    query::{ArgsSlot, HasDateClauses, HasMetaClauses, HasWhere},
    response::Response,
    validate::{int_or_list, list_of_text, text_or_list},
    value::Value,
};
use serde::ser::{Serialize, Serializer};
use std::fmt::Display;

///
/// UserQuery
///
/// Fluent builder for user queries, executed against a [`UserHost`].
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserQuery {
    args: QueryArgs,
}

impl UserQuery {
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
    // Role
    // ------------------------------------------------------------------

    /// Users matching all of the given roles.
    pub fn where_role(self, roles: impl Into<Value>) -> Result<Self, Error> {
        let roles = text_or_list(roles, "User role must be a string or a list of strings.")?;

        Ok(self.set("role", roles))
    }

    /// Users matching at least one of the given roles.
    pub fn where_role_in(self, roles: impl Into<Value>) -> Result<Self, Error> {
        let roles = list_of_text(roles, "User role must be a string or a list of strings.")?;

        Ok(self.set("role__in", roles))
    }

    pub fn where_role_not_in(self, roles: impl Into<Value>) -> Result<Self, Error> {
        let roles = list_of_text(roles, "User role must be a string or a list of strings.")?;

        Ok(self.set("role__not_in", roles))
    }

    // ------------------------------------------------------------------
    // Inclusion & exclusion
    // ------------------------------------------------------------------

    pub fn include_users(self, ids: impl Into<Value>) -> Result<Self, Error> {
        let ids = int_or_list(ids, "User ID must be an integer or a list of integers.")?;

        Ok(self.set("include", ids))
    }

    pub fn where_user_in(self, ids: impl Into<Value>) -> Result<Self, Error> {
        self.include_users(ids)
    }

    pub fn exclude_users(self, ids: impl Into<Value>) -> Result<Self, Error> {
        let ids = int_or_list(ids, "User ID must be an integer or a list of integers.")?;

        Ok(self.set("exclude", ids))
    }

    pub fn where_user_not_in(self, ids: impl Into<Value>) -> Result<Self, Error> {
        self.exclude_users(ids)
    }

    // ------------------------------------------------------------------
    // Blog
    // ------------------------------------------------------------------

    /// Blog id, on multisite networks.
    #[must_use]
    pub fn where_blog_id(self, id: i64) -> Self {
        self.set("blog_id", id)
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// Keyword search. A `*` wildcard before or after the query matches
    /// columns starting with, ending with, or containing it.
    #[must_use]
    pub fn search(self, query: impl Into<String>) -> Self {
        self.set("search", query.into())
    }

    /// Keyword search restricted to specific columns.
    #[must_use]
    pub fn search_columns(self, query: impl Into<String>, columns: impl Into<Value>) -> Self {
        let columns = columns.into();
        let query_builder = if columns.is_null() {
            self
        } else {
            self.set("search_columns", columns)
        };

        query_builder.search(query)
    }

    #[must_use]
    pub fn search_by_id(self, id: impl Into<String>) -> Self {
        self.search_columns(id, "ID")
    }

    #[must_use]
    pub fn search_by_username(self, username: impl Into<String>) -> Self {
        self.search_columns(username, "user_login")
    }

    /// Historical accident kept for compatibility: searches the `user_login`
    /// column, not `user_nicename`.
    #[must_use]
    pub fn search_by_nicename(self, nicename: impl Into<String>) -> Self {
        self.search_columns(nicename, "user_login")
    }

    #[must_use]
    pub fn search_by_email(self, email: impl Into<String>) -> Self {
        self.search_columns(email, "user_email")
    }

    #[must_use]
    pub fn search_by_user_url(self, url: impl Into<String>) -> Self {
        self.search_columns(url, "user_url")
    }

    // ------------------------------------------------------------------
    // Pagination
    // ------------------------------------------------------------------

    #[must_use]
    pub fn limit(self, limit: i64) -> Self {
        self.set("number", limit)
    }

    #[must_use]
    pub fn skip(self, skip: i64) -> Self {
        self.set("offset", skip)
    }

    #[must_use]
    pub fn paginate(self, per_page: i64, paged: i64) -> Self {
        self.set("number", per_page).set("paged", paged)
    }

    // ------------------------------------------------------------------
    // Order
    // ------------------------------------------------------------------

    /// Sort field plus direction. The direction is stored verbatim.
    #[must_use]
    pub fn order_by(self, parameter: impl Into<Value>, order: &str) -> Self {
        self.set("orderby", parameter).set("order", order)
    }

    #[must_use]
    pub fn order_by_desc(self, parameter: impl Into<Value>) -> Self {
        self.order_by(parameter, "DESC")
    }

    #[must_use]
    pub fn order_by_id(self, order: &str) -> Self {
        self.order_by("ID", order)
    }

    #[must_use]
    pub fn order_by_display_name(self, order: &str) -> Self {
        self.order_by("display_name", order)
    }

    #[must_use]
    pub fn order_by_username(self, order: &str) -> Self {
        self.order_by("user_name", order)
    }

    #[must_use]
    pub fn order_by_user_login(self, order: &str) -> Self {
        self.order_by("user_login", order)
    }

    #[must_use]
    pub fn order_by_nicename(self, order: &str) -> Self {
        self.order_by("user_nicename", order)
    }

    #[must_use]
    pub fn order_by_email(self, order: &str) -> Self {
        self.order_by("user_email", order)
    }

    #[must_use]
    pub fn order_by_user_url(self, order: &str) -> Self {
        self.order_by("user_url", order)
    }

    #[must_use]
    pub fn order_by_registered_date(self, order: &str) -> Self {
        self.order_by("user_registered", order)
    }

    #[must_use]
    pub fn order_by_post_count(self, order: &str) -> Self {
        self.order_by("post_count", order)
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

    // ------------------------------------------------------------------
    // Misc filters
    // ------------------------------------------------------------------

    #[must_use]
    pub fn where_is_author(self) -> Self {
        self.set("who", "authors")
    }

    /// Restrict to users who have published posts. `true` checks all public
    /// post types; a name or list of names checks only those types.
    pub fn where_has_published_posts(self, types: impl Into<Value>) -> Result<Self, Error> {
        let types = types.into();
        let valid = match &types {
            Value::Bool(_) | Value::Text(_) => true,
            Value::List(items) => items.iter().all(Value::is_text),
            _ => false,
        };

        if !valid {
            return Err(Error::invalid_argument(
                "where_has_published_posts() expects a post type name string, a list of post type names or true to check all public post types.",
            ));
        }

        Ok(self.set("has_published_posts", types))
    }

    /// Which user fields the host should return.
    pub fn return_fields(self, fields: impl Into<Value>) -> Result<Self, Error> {
        let fields = text_or_list(fields, "Return field must be a string or a list of strings.")?;

        Ok(self.set("fields", fields))
    }

    // ------------------------------------------------------------------
    // Terminal methods
    // ------------------------------------------------------------------

    /// Run the query against the host.
    pub fn get(&self, host: &impl UserHost) -> Result<Response, Error> {
        let rows = host.get_users(&self.to_value())?;

        Ok(Response::new(rows))
    }

    /// Run the query and convert each row into `T`.
    pub fn get_as<T>(&self, host: &impl UserHost) -> Result<Response<T>, Error>
    where
        T: TryFrom<Value>,
        T::Error: Display,
    {
        self.get(host)?.map_into()
    }
}

impl ArgsSlot for UserQuery {
    fn args(&self) -> &QueryArgs {
        &self.args
    }

    fn args_mut(&mut self) -> &mut QueryArgs {
        &mut self.args
    }
}

impl HasWhere for UserQuery {}
impl HasMetaClauses for UserQuery {}
impl HasDateClauses for UserQuery {}

impl TryFrom<Value> for UserQuery {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Ok(Self {
            args: QueryArgs::try_from(value)?,
        })
    }
}

impl Serialize for UserQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.args.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostError;

    struct StubHost;

    impl UserHost for StubHost {
        fn get_users(&self, args: &Value) -> Result<Vec<Value>, HostError> {
            assert!(args.get("role").is_some());
            Ok(vec![Value::Int(1)])
        }
    }

    #[test]
    fn role_filters_validate_their_shape() {
        let q = UserQuery::new().where_role("editor").unwrap();
        assert_eq!(q.args().get_key("role"), Some(&Value::from("editor")));

        let q = UserQuery::new().where_role_in("editor").unwrap();
        assert_eq!(
            q.args().get_key("role__in"),
            Some(&Value::List(vec![Value::from("editor")]))
        );

        let err = UserQuery::new().where_role(1_i64).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid argument: User role must be a string or a list of strings."
        );
    }

    #[test]
    fn search_by_nicename_keeps_its_historical_login_column() {
        let q = UserQuery::new().search_by_nicename("bob");
        assert_eq!(q.args().get_key("search"), Some(&Value::from("bob")));
        assert_eq!(
            q.args().get_key("search_columns"),
            Some(&Value::from("user_login"))
        );
    }

    #[test]
    fn plain_search_sets_no_columns() {
        let q = UserQuery::new().search("*bob*");
        assert_eq!(q.args().get_key("search"), Some(&Value::from("*bob*")));
        assert!(q.args().get_key("search_columns").is_none());
    }

    #[test]
    fn user_order_direction_is_stored_verbatim() {
        let q = UserQuery::new().order_by_email("desc");
        assert_eq!(q.args().get_key("order"), Some(&Value::from("desc")));
    }

    #[test]
    fn has_published_posts_accepts_bool_text_or_text_list() {
        let q = UserQuery::new().where_has_published_posts(true).unwrap();
        assert_eq!(
            q.args().get_key("has_published_posts"),
            Some(&Value::Bool(true))
        );

        assert!(
            UserQuery::new()
                .where_has_published_posts(vec!["post", "page"])
                .is_ok()
        );
        assert!(UserQuery::new().where_has_published_posts(7_i64).is_err());
    }

    #[test]
    fn get_wraps_host_rows() {
        let res = UserQuery::new()
            .where_role("editor")
            .unwrap()
            .get(&StubHost)
            .unwrap();
        assert_eq!(res.len(), 1);
    }
}
