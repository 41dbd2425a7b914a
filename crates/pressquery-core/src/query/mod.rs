//! Entity query builders and the clause traits they share.

mod clauses;
mod post;
mod term;
mod user;

pub use clauses::{ArgsSlot, HasDateClauses, HasMetaClauses, HasWhere};
pub use post::PostQuery;
pub use term::TermQuery;
pub use user::UserQuery;
