//! Core runtime for PressQuery: the dynamic value model, clause sub-builders,
//! entity query builders, and the host traits that execute them.

pub mod args;
pub mod clause;
pub mod compare;
pub mod error;
pub mod host;
pub mod query;
pub mod response;
pub mod value;

pub(crate) mod validate;

///
/// Prelude
///
/// The vocabulary needed to build and run queries.
///

pub mod prelude {
    pub use crate::{
        args::QueryArgs,
        clause::{DateQuery, MetaQuery, Relation, TaxQuery},
        error::Error,
        host::{HostError, OptionHost, PostHost, TermHost, UserHost},
        query::{HasDateClauses, HasMetaClauses, HasWhere, PostQuery, TermQuery, UserQuery},
        response::Response,
        value::Value,
    };
}
