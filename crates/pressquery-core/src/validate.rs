//! Argument-shape validation shared by the entity builders.
//!
//! Setters documented as taking "a single value or a list" funnel through
//! these helpers: a scalar stays scalar (or is wrapped, for the `__in`-style
//! options), a list is checked element-wise, and anything else is rejected
//! with the setter's own message.

use crate::{error::Error, value::Value};

/// True when every item satisfies the predicate.
pub fn every<T>(items: &[T], predicate: impl Fn(&T) -> bool) -> bool {
    items.iter().all(predicate)
}

/// Flatten a scalar-or-list input into a list of entries.
pub(crate) fn into_list(value: Value) -> Vec<Value> {
    match value {
        Value::List(items) => items,
        scalar => vec![scalar],
    }
}

/// Wrap a scalar-or-list into a homogeneous integer list.
pub(crate) fn list_of_ints(value: impl Into<Value>, message: &str) -> Result<Value, Error> {
    let items = into_list(value.into());
    if !every(&items, Value::is_int) {
        return Err(Error::invalid_argument(message));
    }

    Ok(Value::List(items))
}

/// Wrap a scalar-or-list into a homogeneous text list.
pub(crate) fn list_of_text(value: impl Into<Value>, message: &str) -> Result<Value, Error> {
    let items = into_list(value.into());
    if !every(&items, Value::is_text) {
        return Err(Error::invalid_argument(message));
    }

    Ok(Value::List(items))
}

/// Accept a scalar int or an all-int list, preserved as passed.
pub(crate) fn int_or_list(value: impl Into<Value>, message: &str) -> Result<Value, Error> {
    let value = value.into();
    let ok = match &value {
        Value::Int(_) => true,
        Value::List(items) => every(items, Value::is_int),
        _ => false,
    };
    if !ok {
        return Err(Error::invalid_argument(message));
    }

    Ok(value)
}

/// Accept a scalar text or an all-text list, preserved as passed.
pub(crate) fn text_or_list(value: impl Into<Value>, message: &str) -> Result<Value, Error> {
    let value = value.into();
    let ok = match &value {
        Value::Text(_) => true,
        Value::List(items) => every(items, Value::is_text),
        _ => false,
    };
    if !ok {
        return Err(Error::invalid_argument(message));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_of_ints_wraps_scalars_and_keeps_lists() {
        assert_eq!(
            list_of_ints(7, "nope").unwrap(),
            Value::List(vec![Value::Int(7)])
        );
        assert_eq!(
            list_of_ints(vec![2, 6], "nope").unwrap(),
            Value::from(vec![2, 6])
        );
    }

    #[test]
    fn mixed_lists_are_rejected_with_the_caller_message() {
        let err = list_of_ints(
            Value::List(vec![Value::Int(1), Value::Text("x".into())]),
            "Author id must be an int or a list of integer ids",
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid argument: Author id must be an int or a list of integer ids"
        );
    }

    #[test]
    fn scalar_or_list_setters_preserve_shape() {
        assert_eq!(
            text_or_list("publish", "nope").unwrap(),
            Value::Text("publish".into())
        );
        assert_eq!(
            text_or_list(vec!["publish", "draft"], "nope").unwrap(),
            Value::from(vec!["publish", "draft"])
        );
        assert!(int_or_list(Value::Bool(true), "nope").is_err());
    }
}
