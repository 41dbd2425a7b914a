//! Query execution against mock hosts: argument hand-off, row wrapping, and
//! error conversion.

use pressquery::prelude::*;
use std::cell::RefCell;

/// Records the last argument map it was handed and replays canned rows.
struct MockPostHost {
    rows: Vec<Value>,
    fail: Option<HostError>,
    seen: RefCell<Option<Value>>,
}

impl MockPostHost {
    fn with_rows(rows: Vec<Value>) -> Self {
        Self {
            rows,
            fail: None,
            seen: RefCell::new(None),
        }
    }

    fn failing(err: HostError) -> Self {
        Self {
            rows: Vec::new(),
            fail: Some(err),
            seen: RefCell::new(None),
        }
    }
}

impl PostHost for MockPostHost {
    fn get_posts(&self, args: &Value) -> Result<Vec<Value>, HostError> {
        *self.seen.borrow_mut() = Some(args.clone());
        match &self.fail {
            Some(err) => Err(err.clone()),
            None => Ok(self.rows.clone()),
        }
    }

    fn allowed_mime_types(&self) -> Value {
        Value::map([
            ("png", Value::from("image/png")),
            ("pdf", Value::from("application/pdf")),
        ])
    }
}

struct MockOptions;

impl OptionHost for MockOptions {
    fn get_option(&self, name: &str) -> Option<Value> {
        (name == "sticky_posts").then(|| Value::from(vec![11_i64, 12]))
    }
}

struct MockTermHost;

impl TermHost for MockTermHost {
    fn get_terms(&self, _args: &Value) -> Result<Vec<Value>, HostError> {
        Ok(vec![Value::from("jazz"), Value::from("blues")])
    }

    fn count_terms(&self, _args: &Value) -> Result<u64, HostError> {
        Ok(2)
    }
}

fn post_row(id: i64) -> Value {
    Value::map([("ID", Value::Int(id))])
}

#[test]
fn get_hands_the_serialized_args_to_the_host() {
    let host = MockPostHost::with_rows(vec![post_row(1)]);
    let query = PostQuery::new().where_author(5).limit(10);

    let response = query.get(&host).expect("host returns rows");
    assert_eq!(response.len(), 1);

    let seen = host.seen.borrow().clone().expect("host was called");
    assert_eq!(seen.get("author"), Some(&Value::Int(5)));
    assert_eq!(seen.get("posts_per_page"), Some(&Value::Int(10)));
}

#[test]
fn host_failures_convert_to_host_errors() {
    let host = MockPostHost::failing(HostError::new("db gone", 500));
    let err = PostQuery::new().get(&host).expect_err("host fails");
    assert_eq!(err.to_string(), "host error 500: db gone");
}

#[test]
fn all_overrides_an_earlier_limit() {
    let host = MockPostHost::with_rows(vec![post_row(1), post_row(2)]);
    let mut query = PostQuery::new().limit(5);

    let response = query.all(&host).expect("host returns rows");
    assert_eq!(response.len(), 2);

    let seen = host.seen.borrow().clone().expect("host was called");
    assert_eq!(seen.get("posts_per_page"), Some(&Value::Int(-1)));
}

#[test]
fn first_of_all_returns_the_single_ascending_row() {
    let host = MockPostHost::with_rows(vec![post_row(7)]);
    let row = PostQuery::new()
        .first_of_all(&host)
        .expect("a row is available");
    assert_eq!(row, post_row(7));

    let seen = host.seen.borrow().clone().expect("host was called");
    assert_eq!(seen.get("order"), Some(&Value::from("ASC")));
    assert_eq!(seen.get("posts_per_page"), Some(&Value::Int(1)));
}

#[test]
fn last_of_all_orders_descending() {
    let host = MockPostHost::with_rows(vec![post_row(9)]);
    PostQuery::new()
        .last_of_all(&host)
        .expect("a row is available");

    let seen = host.seen.borrow().clone().expect("host was called");
    assert_eq!(seen.get("order"), Some(&Value::from("DESC")));
}

#[test]
fn empty_single_row_queries_report_not_found() {
    let host = MockPostHost::with_rows(Vec::new());
    let err = PostQuery::new()
        .first_of_all(&host)
        .expect_err("no rows available");
    assert_eq!(err.to_string(), "not found: no post found");
}

#[test]
fn typed_rows_convert_through_try_from() {
    #[derive(Debug)]
    struct PostId(i64);

    impl TryFrom<Value> for PostId {
        type Error = String;

        fn try_from(value: Value) -> Result<Self, Self::Error> {
            value
                .get("ID")
                .and_then(Value::as_int)
                .map(Self)
                .ok_or_else(|| "row has no ID".to_string())
        }
    }

    let host = MockPostHost::with_rows(vec![post_row(3), post_row(4)]);
    let ids = PostQuery::new().get_as::<PostId>(&host).expect("rows convert");
    assert_eq!(ids.len(), 2);
    assert_eq!(ids.first().map(|id| id.0), Some(3));

    let host = MockPostHost::with_rows(vec![Value::from("not a row")]);
    let err = PostQuery::new()
        .get_as::<PostId>(&host)
        .expect_err("conversion fails");
    assert_eq!(err.to_string(), "conversion failed: row has no ID");
}

#[test]
fn sticky_posts_are_resolved_through_the_option_host() {
    let posts = MockPostHost::with_rows(Vec::new());
    let query = PostQuery::new()
        .where_sticky(&MockOptions, true)
        .expect("option ids are ints");
    query.get(&posts).expect("host returns rows");

    let seen = posts.seen.borrow().clone().expect("host was called");
    assert_eq!(
        seen.get("post__in"),
        Some(&Value::List(vec![Value::Int(11), Value::Int(12)]))
    );
}

#[test]
fn term_queries_count_without_fetching() {
    let query = TermQuery::new()
        .where_taxonomy("genre")
        .expect("taxonomy is text");

    assert_eq!(query.count(&MockTermHost).expect("host counts"), 2);
    let rows = query.get(&MockTermHost).expect("host returns rows");
    assert_eq!(rows.last(), Some(&Value::from("blues")));
}

#[test]
fn excluding_images_queries_the_mime_registry() {
    let host = MockPostHost::with_rows(Vec::new());
    let query = PostQuery::new()
        .where_not_image(&host)
        .expect("registry values are text");

    assert_eq!(
        serde_json::to_value(&query).expect("args serialize"),
        serde_json::json!({
            "post_mime_type": { "pdf": "application/pdf" },
        })
    );
}
