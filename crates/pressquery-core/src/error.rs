use crate::host::HostError;
use thiserror::Error as ThisError;

///
/// Error
///
/// Public error surface for the builder layer. Every failure is raised
/// synchronously at the call that received the malformed input or observed
/// the host failure; nothing is retried or recovered internally.
///

#[derive(Clone, Debug, ThisError)]
pub enum Error {
    /// Malformed input at a setter or constructor call site.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A single-result terminal call matched nothing.
    #[error("not found: {0}")]
    NotFound(String),

    /// Host-level error value, converted rather than swallowed.
    #[error("host error {code}: {message}")]
    Host { message: String, code: i64 },

    /// A caller-supplied result type could not be constructed from a record.
    #[error("conversion failed: {0}")]
    Convert(String),
}

impl Error {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

impl From<HostError> for Error {
    fn from(err: HostError) -> Self {
        Self::Host {
            message: err.message,
            code: err.code,
        }
    }
}
