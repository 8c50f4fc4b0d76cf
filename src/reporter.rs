use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, trace};
use sentry::protocol::Event;
use sentry::Client;

use crate::client::{ClientFactory, DefaultClientFactory};
use crate::datum::Datum;
use crate::error::Error;
use crate::event::{event_from_datum, EventRequest};

/// Builds events and sends them through a lazily created client.
///
/// The client is created on the first call to [`init`](Reporter::init) or
/// on the first send, whichever comes first, and then kept for the lifetime
/// of the reporter.  Concurrent first calls construct exactly one client.
///
/// ```
/// use sentry_datum::{EventRequest, Reporter};
///
/// let reporter = Reporter::new();
/// reporter.init(Some("")).unwrap();
/// let event_id = reporter.send(EventRequest::new().message("hello")).unwrap();
/// assert_eq!(event_id.len(), 32);
/// ```
pub struct Reporter<F = DefaultClientFactory> {
    factory: F,
    client: RwLock<Option<Arc<Client>>>,
}

impl Reporter<DefaultClientFactory> {
    /// Creates a reporter using the [`DefaultClientFactory`].
    pub fn new() -> Reporter<DefaultClientFactory> {
        Reporter::with_factory(DefaultClientFactory)
    }
}

impl Default for Reporter<DefaultClientFactory> {
    fn default() -> Self {
        Reporter::new()
    }
}

impl<F: ClientFactory> Reporter<F> {
    /// Creates a reporter that constructs its client with `factory`.
    pub fn with_factory(factory: F) -> Reporter<F> {
        Reporter {
            factory,
            client: RwLock::new(None),
        }
    }

    /// Returns `true` once a client has been constructed.
    pub fn is_initialized(&self) -> bool {
        self.client().is_some()
    }

    /// Returns the client if it has been constructed.
    pub fn client(&self) -> Option<Arc<Client>> {
        self.client
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the client, constructing it on first use.
    ///
    /// Once a client exists the `dsn` argument is ignored.  If the factory
    /// fails the reporter stays uninitialized and the next call tries again.
    pub fn init(&self, dsn: Option<&str>) -> Result<Arc<Client>, Error> {
        if let Some(client) = self.client() {
            return Ok(client);
        }

        let mut slot = self.client.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(ref client) = *slot {
            return Ok(client.clone());
        }

        let client = Arc::new(self.factory.create_client(dsn)?);
        if let Some(dsn) = client.dsn() {
            debug!("enabled sentry client for DSN {}", dsn);
        } else {
            debug!("initialized disabled sentry client due to disabled or invalid DSN");
        }
        *slot = Some(client.clone());
        Ok(client)
    }

    /// Builds and sends an event.
    ///
    /// Returns the event id without hyphens.  The id is returned even if
    /// the client decides to drop the event.
    pub fn send(&self, request: EventRequest) -> Result<String, Error> {
        self.capture(request.build())
    }

    /// Builds an event from a loosely-typed event map and sends it.
    pub fn send_datum(&self, datum: &Datum) -> Result<String, Error> {
        self.capture(event_from_datum(datum)?)
    }

    /// Sends an already built event.
    pub fn capture(&self, event: Event<'static>) -> Result<String, Error> {
        let client = self.init(None)?;
        let event_id = event.event_id;
        trace!("capturing event {}", event_id);
        client.capture_event(event, None);
        Ok(event_id.to_string().replace('-', ""))
    }
}
