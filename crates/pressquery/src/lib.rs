//! Fluent query builders for WordPress-style content hosts.
//!
//! ## Crate layout
//! - `core`: the dynamic value model, clause sub-builders, entity query
//!   builders, and the host traits that execute them.
//!
//! The `prelude` module mirrors the surface application code actually uses:
//! the three entity builders, their clause traits, and the host traits the
//! embedding runtime must implement.

pub use pressquery_core as core;

pub use pressquery_core::{
    args::QueryArgs,
    clause::{ClauseGroup, DateQuery, MetaQuery, Relation, TaxQuery},
    error::Error,
    host::{HostError, OptionHost, PostHost, TermHost, UserHost},
    query::{ArgsSlot, PostQuery, TermQuery, UserQuery},
    response::Response,
    value::Value,
};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::core::{
        args::QueryArgs,
        clause::{DateQuery, MetaQuery, Relation, TaxQuery},
        error::Error,
        host::{HostError, OptionHost, PostHost, TermHost, UserHost},
        query::{
            HasDateClauses as _, HasMetaClauses as _, HasWhere as _, PostQuery, TermQuery,
            UserQuery,
        },
        response::Response,
        value::Value,
    };
    pub use serde::Serialize;
}
