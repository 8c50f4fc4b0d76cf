use sentry::types::ParseDsnError;
use thiserror::Error;

/// The error type for building and sending events.
///
/// Failures that happen while the event travels to Sentry are not
/// represented here: they are handled (and swallowed) by the transport of
/// the underlying [`sentry::Client`].
#[derive(Debug, Error)]
pub enum Error {
    /// A symbolic level or type tag outside of its closed set.
    #[error("unmapped {kind} value: {value:?}")]
    UnmappedEnumValue {
        /// The kind of tag that was being mapped (`level`, `breadcrumb type`, ...).
        kind: &'static str,
        /// The offending tag as given.
        value: String,
    },
    /// A field of a loosely-typed request had the wrong shape.
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue {
        /// The key of the offending field.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },
    /// The DSN handed to the client factory could not be parsed.
    #[error("invalid DSN")]
    InvalidDsn(#[from] ParseDsnError),
}

impl Error {
    pub(crate) fn unmapped(kind: &'static str, value: impl Into<String>) -> Error {
        Error::UnmappedEnumValue {
            kind,
            value: value.into(),
        }
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Error {
        Error::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}
