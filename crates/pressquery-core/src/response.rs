use crate::{error::Error, value::Value};
use derive_more::{Deref, IntoIterator};
use std::fmt::Display;

///
/// Response
///
/// Rows returned by a host query, in host order.
///

#[derive(Clone, Debug, Default, Deref, IntoIterator, PartialEq)]
pub struct Response<T = Value>(#[into_iterator(owned, ref)] pub Vec<T>);

impl<T> Response<T> {
    #[must_use]
    pub const fn new(rows: Vec<T>) -> Self {
        Self(rows)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.0.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.0.last()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.0
    }

    #[must_use]
    pub fn into_first(self) -> Option<T> {
        self.0.into_iter().next()
    }
}

impl Response<Value> {
    /// Convert every row into `T`, failing on the first row that does not
    /// convert.
    pub fn map_into<T>(self) -> Result<Response<T>, Error>
    where
        T: TryFrom<Value>,
        T::Error: Display,
    {
        let rows = self
            .0
            .into_iter()
            .map(|row| T::try_from(row).map_err(|err| Error::Convert(err.to_string())))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Response(rows))
    }
}

impl<T> From<Vec<T>> for Response<T> {
    fn from(rows: Vec<T>) -> Self {
        Self(rows)
    }
}
