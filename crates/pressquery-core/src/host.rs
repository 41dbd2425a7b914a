use crate::value::Value;
use thiserror::Error as ThisError;

///
/// HostError
///
/// Failure reported by the host engine when executing a query. The code is
/// host-defined and passed through untouched.
///

#[derive(Clone, Debug, ThisError, PartialEq)]
#[error("{message} (code {code})")]
pub struct HostError {
    pub message: String,
    pub code: i64,
}

impl HostError {
    #[must_use]
    pub fn new(message: impl Into<String>, code: i64) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }
}

///
/// PostHost
///
/// Host engine surface for post queries. `args` is the serialized argument
/// map the builder produced.
///

pub trait PostHost {
    fn get_posts(&self, args: &Value) -> Result<Vec<Value>, HostError>;

    /// Mime type registry, as a `{label: mime}` map.
    fn allowed_mime_types(&self) -> Value;
}

///
/// TermHost
///

pub trait TermHost {
    fn get_terms(&self, args: &Value) -> Result<Vec<Value>, HostError>;

    fn count_terms(&self, args: &Value) -> Result<u64, HostError>;
}

///
/// UserHost
///

pub trait UserHost {
    fn get_users(&self, args: &Value) -> Result<Vec<Value>, HostError>;
}

///
/// OptionHost
///
/// Key-value settings store. `None` means the option is not set.
///

pub trait OptionHost {
    fn get_option(&self, name: &str) -> Option<Value>;
}
