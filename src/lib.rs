//! Build and send Sentry events from loosely-typed data.
//!
//! This crate sits between code that describes events as plain nested data
//! (maps keyed by keywords or strings, sequences and scalars) and the
//! [`sentry`] client.  It translates that data into the Sentry protocol and
//! hands the result to a client that is created once, on first use.  All
//! transport concerns (HTTP, rate limits, queueing) stay with the client.
//!
//! # Quickstart
//!
//! ```
//! use sentry_datum::{Datum, EventLevel, EventRequest};
//!
//! let request = EventRequest::new()
//!     .message("payment declined")
//!     .level(EventLevel::Warning)
//!     .tag(Datum::keyword(":retries"), 3)
//!     .extra(
//!         Datum::keyword(":order"),
//!         Datum::map(vec![(Datum::keyword(":id"), Datum::from(1234))]),
//!     );
//!
//! // Without a DSN (and without `SENTRY_DSN` in the environment) the
//! // client is disabled and the event is dropped, but the id still comes
//! // back.
//! let event_id = sentry_datum::send(request).unwrap();
//! assert_eq!(event_id.len(), 32);
//! ```
//!
//! # Loosely-typed input
//!
//! Whole events can be described as a single [`Datum`] map and sent with
//! [`send_datum`], or turned into a protocol event with
//! [`event_from_datum`]:
//!
//! ```
//! use sentry_datum::{event_from_datum, Datum};
//!
//! let datum = Datum::map(vec![
//!     (Datum::keyword(":message"), Datum::from("disk almost full")),
//!     (Datum::keyword(":level"), Datum::keyword(":warning")),
//!     (
//!         Datum::keyword(":tags"),
//!         Datum::map(vec![(Datum::keyword(":ok"), Datum::from(true))]),
//!     ),
//! ]);
//! let event = event_from_datum(&datum).unwrap();
//! assert_eq!(event.tags["ok"], "true");
//! ```
//!
//! Level and type tags form closed sets.  An unknown tag fails with
//! [`Error::UnmappedEnumValue`] instead of falling back to a default.
//!
//! # Clients
//!
//! The free functions in this crate use a process-wide [`Reporter`].  Code
//! that prefers to pass its dependencies around explicitly can create its
//! own `Reporter`, optionally with a custom [`ClientFactory`].
//!
//! # Features
//!
//! * `transport`: enables the default HTTP transport of the `sentry` crate
//!   (*enabled by default*).
//! * `test`: enables `sentry::test`.

#![doc(html_favicon_url = "https://sentry-brand.storage.googleapis.com/favicon.ico")]
#![doc(html_logo_url = "https://sentry-brand.storage.googleapis.com/sentry-glyph-black.png")]
#![warn(missing_docs)]
#![deny(unsafe_code)]

mod api;
mod breadcrumb;
mod client;
mod datum;
mod error;
mod event;
mod failure;
mod levels;
mod normalize;
mod reporter;
mod utils;

pub use crate::api::{init, is_initialized, reporter, send, send_datum};
pub use crate::breadcrumb::BreadcrumbRequest;
pub use crate::client::{ClientFactory, DefaultClientFactory};
pub use crate::datum::Datum;
pub use crate::error::Error;
pub use crate::event::{event_from_datum, Checksum, EventRequest};
pub use crate::failure::Failure;
pub use crate::levels::{BreadcrumbLevel, BreadcrumbType, EventLevel};
pub use crate::normalize::{normalize, normalize_map};
pub use crate::reporter::Reporter;
