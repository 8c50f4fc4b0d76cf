use std::borrow::Cow;
use std::time::SystemTime;

use log::debug;
use sentry::protocol::{Context, Event, Map, Value};
use sentry::types::Uuid;
use sha2::{Digest, Sha256};

use crate::breadcrumb::BreadcrumbRequest;
use crate::datum::Datum;
use crate::error::Error;
use crate::failure::Failure;
use crate::levels::EventLevel;
use crate::normalize::{normalize, normalize_map};
use crate::utils::{
    expect_map, field, map_field, seq_field, string_field, tag_field, timestamp_field,
};

/// The grouping checksum of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Checksum {
    /// A checksum computed by the caller.
    Value(String),
    /// A seed the checksum is computed from.
    Seed(String),
}

impl Checksum {
    /// Returns the checksum text.
    ///
    /// A seed is hashed with SHA-256 and the first 32 hex digits are kept.
    pub fn value(&self) -> String {
        match self {
            Checksum::Value(value) => value.clone(),
            Checksum::Seed(seed) => {
                let mut digest = hex::encode(Sha256::digest(seed.as_bytes()));
                digest.truncate(32);
                digest
            }
        }
    }
}

/// The description of an event to send.
///
/// All fields are optional.  Unset fields are left at the defaults of
/// [`Event`] (and the client fills in release, environment and server name
/// from its options when they are missing).
///
/// ```
/// use sentry_datum::{Datum, EventLevel, EventRequest};
///
/// let event = EventRequest::new()
///     .message("cache miss storm")
///     .level(EventLevel::Warning)
///     .tag(Datum::keyword(":retries"), 3)
///     .build();
/// assert_eq!(event.message.as_deref(), Some("cache miss storm"));
/// assert_eq!(event.tags["retries"], "3");
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventRequest {
    /// The event id.  A random one is generated when unset.
    pub event_id: Option<Uuid>,
    /// The message.
    pub message: Option<String>,
    /// The severity.
    pub level: Option<EventLevel>,
    /// The release identifier.
    pub release: Option<String>,
    /// The environment name.
    pub environment: Option<String>,
    /// The name of the logger that produced the event.
    pub logger: Option<String>,
    /// The platform identifier.
    pub platform: Option<String>,
    /// The culprit.
    pub culprit: Option<String>,
    /// Tags; keys and values are coerced to text.
    pub tags: Vec<(Datum, Datum)>,
    /// Breadcrumbs, oldest first.
    pub breadcrumbs: Vec<BreadcrumbRequest>,
    /// The server name.
    pub server_name: Option<String>,
    /// Extra data, normalized before it is attached.
    pub extra: Vec<(Datum, Datum)>,
    /// An explicit grouping fingerprint.
    pub fingerprint: Vec<String>,
    /// A grouping checksum.
    pub checksum: Option<Checksum>,
    /// Custom interfaces by name.
    pub interfaces: Vec<(Datum, Datum)>,
    /// The failure that caused the event.
    pub failure: Option<Failure>,
    /// When the event happened.
    pub timestamp: Option<SystemTime>,
}

impl EventRequest {
    /// Creates an empty request.
    pub fn new() -> EventRequest {
        Default::default()
    }

    /// Sets the event id.
    pub fn event_id(mut self, event_id: Uuid) -> Self {
        self.event_id = Some(event_id);
        self
    }

    /// Sets the message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the severity.
    pub fn level(mut self, level: EventLevel) -> Self {
        self.level = Some(level);
        self
    }

    /// Sets the release.
    pub fn release(mut self, release: impl Into<String>) -> Self {
        self.release = Some(release.into());
        self
    }

    /// Sets the environment.
    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Sets the logger name.
    pub fn logger(mut self, logger: impl Into<String>) -> Self {
        self.logger = Some(logger.into());
        self
    }

    /// Sets the platform.
    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Sets the culprit.
    pub fn culprit(mut self, culprit: impl Into<String>) -> Self {
        self.culprit = Some(culprit.into());
        self
    }

    /// Adds a tag.
    pub fn tag(mut self, key: impl Into<Datum>, value: impl Into<Datum>) -> Self {
        self.tags.push((key.into(), value.into()));
        self
    }

    /// Appends a breadcrumb.
    pub fn breadcrumb(mut self, breadcrumb: BreadcrumbRequest) -> Self {
        self.breadcrumbs.push(breadcrumb);
        self
    }

    /// Sets the server name.
    pub fn server_name(mut self, server_name: impl Into<String>) -> Self {
        self.server_name = Some(server_name.into());
        self
    }

    /// Adds an extra data entry.
    pub fn extra(mut self, key: impl Into<Datum>, value: impl Into<Datum>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    /// Sets the fingerprint.
    pub fn fingerprint<I, S>(mut self, fingerprint: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fingerprint = fingerprint.into_iter().map(Into::into).collect();
        self
    }

    /// Sets an explicit checksum.
    pub fn checksum(mut self, checksum: impl Into<String>) -> Self {
        self.checksum = Some(Checksum::Value(checksum.into()));
        self
    }

    /// Sets the seed to compute the checksum from.
    pub fn checksum_for(mut self, seed: impl Into<String>) -> Self {
        self.checksum = Some(Checksum::Seed(seed.into()));
        self
    }

    /// Adds a custom interface.
    pub fn interface(mut self, name: impl Into<Datum>, data: impl Into<Datum>) -> Self {
        self.interfaces.push((name.into(), data.into()));
        self
    }

    /// Sets the causing failure.
    pub fn failure(mut self, failure: impl Into<Failure>) -> Self {
        self.failure = Some(failure.into());
        self
    }

    /// Sets the timestamp.
    pub fn timestamp(mut self, timestamp: SystemTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// The extra data of the event: the failure context overlaid with the
    /// caller supplied entries, normalized.
    pub fn merged_extra(&self) -> Map<String, Value> {
        let failure_data = self.failure.as_ref().map_or(&[][..], Failure::data);
        let merged: Vec<(Datum, Datum)> = failure_data
            .iter()
            .chain(self.extra.iter())
            .cloned()
            .collect();
        normalize_map(&merged)
    }

    /// Builds the protocol event.
    pub fn build(&self) -> Event<'static> {
        let mut event = Event::default();
        if let Some(event_id) = self.event_id {
            event.event_id = event_id;
        }
        if let Some(level) = self.level {
            event.level = level.into();
        }
        if let Some(ref platform) = self.platform {
            event.platform = Cow::Owned(platform.clone());
        }
        if let Some(timestamp) = self.timestamp {
            event.timestamp = timestamp;
        }
        event.message = self.message.clone();
        event.release = self.release.clone().map(Cow::Owned);
        event.environment = self.environment.clone().map(Cow::Owned);
        event.logger = self.logger.clone();
        event.culprit = self.culprit.clone();
        event.server_name = self.server_name.clone().map(Cow::Owned);

        event.tags = self
            .tags
            .iter()
            .map(|(key, value)| (key.to_text(), value.to_text()))
            .collect();
        event.breadcrumbs = self
            .breadcrumbs
            .iter()
            .map(BreadcrumbRequest::build)
            .collect::<Vec<_>>()
            .into();
        event.extra = self.merged_extra();

        for (name, data) in &self.interfaces {
            let name = name.to_text();
            let context = interface_context(&name, data);
            event.contexts.insert(name, context);
        }
        if let Some(ref failure) = self.failure {
            event.exception = failure.exceptions();
        }

        let checksum = self.checksum.as_ref().map(Checksum::value);
        if !self.fingerprint.is_empty() {
            event.fingerprint = Cow::Owned(
                self.fingerprint
                    .iter()
                    .map(|part| Cow::Owned(part.clone()))
                    .collect(),
            );
            if let Some(checksum) = checksum {
                event.tags.insert("checksum".into(), checksum);
            }
        } else if let Some(checksum) = checksum {
            event.fingerprint = Cow::Owned(vec![Cow::Owned(checksum)]);
        }

        event
    }
}

fn interface_context(name: &str, data: &Datum) -> Context {
    match data {
        Datum::Map(entries) => Context::Other(normalize_map(entries)),
        other => {
            debug!("interface {} is not a map, wrapping it as `value`", name);
            let mut map = Map::new();
            map.insert("value".to_owned(), normalize(other));
            Context::Other(map)
        }
    }
}

impl TryFrom<&'_ Datum> for EventRequest {
    type Error = Error;

    /// Reads an event map.
    ///
    /// The failure cannot be expressed as data and is always unset.
    fn try_from(datum: &Datum) -> Result<EventRequest, Error> {
        expect_map(datum, "event")?;

        let event_id = match field(datum, "event-id") {
            None => None,
            Some(value) => {
                let text = value.as_str().ok_or_else(|| {
                    Error::invalid("event-id", format!("expected a string, got {}", value))
                })?;
                let id = Uuid::parse_str(text)
                    .map_err(|err| Error::invalid("event-id", err.to_string()))?;
                Some(id)
            }
        };

        let breadcrumbs = seq_field(datum, "breadcrumbs")?
            .iter()
            .map(|crumb| BreadcrumbRequest::try_from(crumb))
            .collect::<Result<Vec<_>, _>>()?;

        let fingerprint = seq_field(datum, "fingerprint")?
            .iter()
            .map(Datum::to_text)
            .collect();

        let checksum = match string_field(datum, "checksum")? {
            Some(value) => Some(Checksum::Value(value)),
            None => string_field(datum, "checksum-for")?.map(Checksum::Seed),
        };

        Ok(EventRequest {
            event_id,
            message: string_field(datum, "message")?,
            level: tag_field(datum, "level")?,
            release: string_field(datum, "release")?,
            environment: string_field(datum, "environment")?,
            logger: string_field(datum, "logger")?,
            platform: string_field(datum, "platform")?,
            culprit: string_field(datum, "culprit")?,
            tags: map_field(datum, "tags")?,
            breadcrumbs,
            server_name: string_field(datum, "server-name")?,
            extra: map_field(datum, "extra")?,
            fingerprint,
            checksum,
            interfaces: map_field(datum, "interfaces")?,
            failure: None,
            timestamp: timestamp_field(datum, "timestamp")?,
        })
    }
}

/// Builds a protocol event straight from a loosely-typed event map.
///
/// ```
/// use sentry_datum::{event_from_datum, Datum};
///
/// let datum = Datum::map(vec![
///     (Datum::keyword(":message"), Datum::from("hello")),
///     (Datum::keyword(":level"), Datum::keyword(":info")),
/// ]);
/// let event = event_from_datum(&datum).unwrap();
/// assert_eq!(event.level, sentry::Level::Info);
/// ```
pub fn event_from_datum(datum: &Datum) -> Result<Event<'static>, Error> {
    EventRequest::try_from(datum).map(|request| request.build())
}
