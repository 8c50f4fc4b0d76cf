//! Mapping of symbolic level and type tags onto protocol constants.
//!
//! Each tag set is closed.  Parsing a tag outside of it fails with
//! [`Error::UnmappedEnumValue`]; there is no fallback level.

use std::fmt;
use std::str::FromStr;

use sentry::Level;

use crate::datum::Datum;
use crate::error::Error;

macro_rules! impl_tag {
    ($type:ident, $kind:expr, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $type {
            /// Returns the tag name of this value.
            pub fn as_str(&self) -> &'static str {
                match *self {
                    $($type::$variant => $name,)+
                }
            }
        }

        impl FromStr for $type {
            type Err = Error;

            fn from_str(tag: &str) -> Result<$type, Error> {
                match tag.strip_prefix(':').unwrap_or(tag) {
                    $($name => Ok($type::$variant),)+
                    _ => Err(Error::unmapped($kind, tag)),
                }
            }
        }

        impl fmt::Display for $type {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl TryFrom<&'_ Datum> for $type {
            type Error = Error;

            fn try_from(datum: &Datum) -> Result<$type, Error> {
                match datum.as_str() {
                    Some(tag) => tag.parse(),
                    None => Err(Error::unmapped($kind, datum.to_string())),
                }
            }
        }
    };
}

/// The severity of an event.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EventLevel {
    /// `:debug`
    Debug,
    /// `:info`
    Info,
    /// `:warning`
    Warning,
    /// `:error`
    Error,
    /// `:fatal`
    Fatal,
}

impl_tag!(EventLevel, "level", {
    Debug => "debug",
    Info => "info",
    Warning => "warning",
    Error => "error",
    Fatal => "fatal",
});

impl From<EventLevel> for Level {
    fn from(level: EventLevel) -> Level {
        match level {
            EventLevel::Debug => Level::Debug,
            EventLevel::Info => Level::Info,
            EventLevel::Warning => Level::Warning,
            EventLevel::Error => Level::Error,
            EventLevel::Fatal => Level::Fatal,
        }
    }
}

/// The severity of a breadcrumb.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BreadcrumbLevel {
    /// `:debug`
    Debug,
    /// `:info`
    Info,
    /// `:warning`
    Warning,
    /// `:error`
    Error,
    /// `:critical`
    Critical,
}

impl_tag!(BreadcrumbLevel, "breadcrumb level", {
    Debug => "debug",
    Info => "info",
    Warning => "warning",
    Error => "error",
    Critical => "critical",
});

impl From<BreadcrumbLevel> for Level {
    fn from(level: BreadcrumbLevel) -> Level {
        match level {
            BreadcrumbLevel::Debug => Level::Debug,
            BreadcrumbLevel::Info => Level::Info,
            BreadcrumbLevel::Warning => Level::Warning,
            BreadcrumbLevel::Error => Level::Error,
            BreadcrumbLevel::Critical => Level::Fatal,
        }
    }
}

/// The kind of a breadcrumb.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BreadcrumbType {
    /// `:default`
    Default,
    /// `:http`
    Http,
    /// `:navigation`
    Navigation,
}

impl_tag!(BreadcrumbType, "breadcrumb type", {
    Default => "default",
    Http => "http",
    Navigation => "navigation",
});

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_event_levels_are_distinct() {
        let tags = ["debug", "info", "warning", "error", "fatal"];
        let levels: HashSet<String> = tags
            .iter()
            .map(|tag| Level::from(tag.parse::<EventLevel>().unwrap()).to_string())
            .collect();
        assert_eq!(levels.len(), tags.len());
    }

    #[test]
    fn test_breadcrumb_levels_are_distinct() {
        let tags = [":debug", ":info", ":warning", ":error", ":critical"];
        let levels: HashSet<String> = tags
            .iter()
            .map(|tag| Level::from(tag.parse::<BreadcrumbLevel>().unwrap()).to_string())
            .collect();
        assert_eq!(levels.len(), tags.len());
        assert_eq!(Level::from(BreadcrumbLevel::Critical), Level::Fatal);
    }

    #[test]
    fn test_unmapped_tags() {
        match "verbose".parse::<EventLevel>() {
            Err(Error::UnmappedEnumValue { kind, value }) => {
                assert_eq!(kind, "level");
                assert_eq!(value, "verbose");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!("critical".parse::<EventLevel>().is_err());
        assert!("fatal".parse::<BreadcrumbLevel>().is_err());
        assert!(":query".parse::<BreadcrumbType>().is_err());
    }

    #[test]
    fn test_from_datum() {
        assert_eq!(
            BreadcrumbType::try_from(&Datum::keyword(":http")).unwrap(),
            BreadcrumbType::Http
        );
        assert_eq!(
            EventLevel::try_from(&Datum::from("warning")).unwrap(),
            EventLevel::Warning
        );
        assert!(matches!(
            EventLevel::try_from(&Datum::from(3)),
            Err(Error::UnmappedEnumValue { .. })
        ));
    }

    #[test]
    fn test_display_round_trips_names() {
        assert_eq!(BreadcrumbType::Navigation.to_string(), "navigation");
        assert_eq!(EventLevel::Fatal.as_str(), "fatal");
    }
}
