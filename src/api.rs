use std::sync::Arc;

use sentry::Client;

use crate::datum::Datum;
use crate::error::Error;
use crate::event::EventRequest;
use crate::reporter::Reporter;

lazy_static::lazy_static! {
    static ref REPORTER: Reporter = Reporter::new();
}

/// Returns the process-wide reporter.
pub fn reporter() -> &'static Reporter {
    &REPORTER
}

/// Initializes the process-wide client.
///
/// Only the first successful call constructs a client; later calls return
/// it and ignore their `dsn`.  With `None` the DSN is read from
/// `SENTRY_DSN`.
pub fn init(dsn: Option<&str>) -> Result<Arc<Client>, Error> {
    REPORTER.init(dsn)
}

/// Returns `true` once the process-wide client exists.
pub fn is_initialized() -> bool {
    REPORTER.is_initialized()
}

/// Builds and sends an event through the process-wide client.
///
/// The client is initialized from the environment if [`init`] has not been
/// called yet.  Returns the event id without hyphens.
pub fn send(request: EventRequest) -> Result<String, Error> {
    REPORTER.send(request)
}

/// Builds an event from a loosely-typed event map and sends it through the
/// process-wide client.
pub fn send_datum(datum: &Datum) -> Result<String, Error> {
    REPORTER.send_datum(datum)
}
