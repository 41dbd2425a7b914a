//! Property checks over the builder surface.

use pressquery::prelude::*;
use proptest::{prelude::*, test_runner::TestCaseError};

fn arg_key() -> impl Strategy<Value = String> {
    "[a-z_]{1,12}"
}

fn arg_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        "[a-z0-9 ]{0,16}".prop_map(Value::from),
        proptest::collection::vec(any::<i64>(), 0..4).prop_map(Value::from),
    ]
}

proptest! {
    #[test]
    fn builders_round_trip_their_argument_maps(
        entries in proptest::collection::vec((arg_key(), arg_value()), 0..8)
    ) {
        let mut query = PostQuery::new();
        for (key, value) in entries {
            query = query.set(key, value);
        }

        let restored = PostQuery::try_from(query.to_value()).expect("map seeds round trip");
        prop_assert_eq!(restored, query);
    }

    #[test]
    fn scalar_ids_match_their_singleton_lists(id in any::<i64>()) {
        let scalar = PostQuery::new().where_post_in(id).expect("int is valid");
        let list = PostQuery::new().where_post_in(vec![id]).expect("ints are valid");
        prop_assert_eq!(scalar.to_value(), list.to_value());
    }

    #[test]
    fn meta_groups_mark_a_relation_exactly_when_growing(
        clauses in proptest::collection::vec(("[a-z]{1,8}", "[a-z0-9]{0,8}"), 1..6)
    ) {
        let mut query = MetaQuery::new();
        for (key, value) in &clauses {
            query = query.where_clause(key.clone(), value.clone());
        }

        match query.to_value() {
            Value::List(entries) => {
                prop_assert_eq!(clauses.len(), 1);
                prop_assert_eq!(entries.len(), 1);
            }
            Value::Map(entries) => {
                prop_assert!(clauses.len() > 1);
                prop_assert_eq!(entries[0].0.as_str(), "relation");
                prop_assert_eq!(&entries[0].1, &Value::from("AND"));
                prop_assert_eq!(entries.len(), clauses.len() + 1);
            }
            other => prop_assert!(false, "unexpected group shape: {}", other.kind()),
        }
    }

    #[test]
    fn forced_or_relations_survive_later_appends(
        clauses in proptest::collection::vec(("[a-z]{1,8}", "[a-z0-9]{0,8}"), 2..6)
    ) {
        let mut query = MetaQuery::new();
        for (i, (key, value)) in clauses.iter().enumerate() {
            query = if i == 1 {
                query.or_where(key.clone(), value.clone())
            } else {
                query.where_clause(key.clone(), value.clone())
            };
        }

        let Value::Map(entries) = query.to_value() else {
            return Err(TestCaseError::fail("forced relation must serialize as a map"));
        };
        prop_assert_eq!(&entries[0].1, &Value::from("OR"));
    }
}
