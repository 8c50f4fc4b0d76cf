use sentry::{Client, ClientOptions, IntoDsn};

use crate::error::Error;

/// Constructs the [`Client`] a [`Reporter`](crate::Reporter) sends through.
///
/// The factory is called at most once per reporter.  It is implemented for
/// closures so tests and embedders can supply their own clients:
///
/// ```
/// use sentry::{Client, ClientOptions};
/// use sentry_datum::{Error, Reporter};
///
/// let reporter = Reporter::with_factory(|_dsn: Option<&str>| -> Result<Client, Error> {
///     Ok(Client::with_options(ClientOptions::default()))
/// });
/// assert!(!reporter.is_initialized());
/// ```
pub trait ClientFactory: Send + Sync {
    /// Creates a client for the given DSN.
    ///
    /// `None` asks the factory to discover the DSN on its own.
    fn create_client(&self, dsn: Option<&str>) -> Result<Client, Error>;
}

impl<F> ClientFactory for F
where
    F: Fn(Option<&str>) -> Result<Client, Error> + Send + Sync,
{
    fn create_client(&self, dsn: Option<&str>) -> Result<Client, Error> {
        (*self)(dsn)
    }
}

/// The factory used by default.
///
/// It always uses the same configuration: the given DSN on top of
/// [`sentry::apply_defaults`].  Without a DSN (or with an empty one) the DSN
/// is taken from the `SENTRY_DSN` environment variable, and release,
/// environment and server name are filled in from `SENTRY_RELEASE`,
/// `SENTRY_ENVIRONMENT` and the host name.  If no DSN can be found the
/// client is created disabled and drops every event.
///
/// Sending to a DSN needs the `transport` feature of this crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultClientFactory;

impl DefaultClientFactory {
    /// The client options for a DSN.
    pub fn options(&self, dsn: Option<&str>) -> Result<ClientOptions, Error> {
        let dsn = dsn.into_dsn()?;
        Ok(sentry::apply_defaults(ClientOptions {
            dsn,
            ..Default::default()
        }))
    }
}

impl ClientFactory for DefaultClientFactory {
    fn create_client(&self, dsn: Option<&str>) -> Result<Client, Error> {
        self.options(dsn).map(Client::with_options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_dsn() {
        let options = DefaultClientFactory
            .options(Some("https://public@sentry.invalid/42"))
            .unwrap();
        let dsn = options.dsn.unwrap();
        assert_eq!(dsn.host(), "sentry.invalid");
        assert_eq!(dsn.public_key(), "public");
    }

    #[test]
    fn test_invalid_dsn() {
        assert!(matches!(
            DefaultClientFactory.create_client(Some("not a dsn")),
            Err(Error::InvalidDsn(_))
        ));
    }

    #[test]
    fn test_environment_defaults_applied() {
        let options = DefaultClientFactory.options(Some("")).unwrap();
        assert!(options.environment.is_some());
    }
}
