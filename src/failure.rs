use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use sentry::protocol::{Exception, Values};

use crate::datum::Datum;

/// The failure that caused an event, with optional structured context.
///
/// The error chain ends up in the exception interface of the event and the
/// context is merged into its extra data.
///
/// ```
/// use sentry_datum::{Datum, Failure};
///
/// let err = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
/// let failure = Failure::with_data(err, vec![(Datum::keyword(":code"), Datum::from(42))]);
/// assert_eq!(failure.to_string(), "disk on fire");
/// ```
#[derive(Clone)]
pub struct Failure {
    error: Arc<dyn StdError + Send + Sync + 'static>,
    data: Vec<(Datum, Datum)>,
}

impl Failure {
    /// Wraps an error without structured context.
    pub fn new<E>(error: E) -> Failure
    where
        E: StdError + Send + Sync + 'static,
    {
        Failure::with_data(error, Vec::new())
    }

    /// Wraps an error together with structured context.
    pub fn with_data<E>(error: E, data: Vec<(Datum, Datum)>) -> Failure
    where
        E: StdError + Send + Sync + 'static,
    {
        Failure {
            error: Arc::new(error),
            data,
        }
    }

    /// The wrapped error.
    pub fn error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.error
    }

    /// The structured context attached to the error.
    pub fn data(&self) -> &[(Datum, Datum)] {
        &self.data
    }

    /// Builds the exception interface for the error chain, oldest error first.
    pub fn exceptions(&self) -> Values<Exception> {
        sentry::event_from_error(self.error()).exception
    }
}

impl<E> From<E> for Failure
where
    E: StdError + Send + Sync + 'static,
{
    fn from(error: E) -> Failure {
        Failure::new(error)
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Failure")
            .field("error", &self.error)
            .field("data", &self.data)
            .finish()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}
