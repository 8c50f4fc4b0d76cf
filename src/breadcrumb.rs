use std::time::SystemTime;

use sentry::protocol::{Breadcrumb, Value};

use crate::datum::Datum;
use crate::error::Error;
use crate::levels::{BreadcrumbLevel, BreadcrumbType};
use crate::utils::{expect_map, map_field, string_field, tag_field, timestamp_field};

/// The description of a single breadcrumb.
///
/// Every field is optional; unset fields keep the defaults of
/// [`Breadcrumb`].
///
/// ```
/// use sentry_datum::{BreadcrumbLevel, BreadcrumbRequest, BreadcrumbType};
///
/// let crumb = BreadcrumbRequest::new()
///     .ty(BreadcrumbType::Http)
///     .level(BreadcrumbLevel::Warning)
///     .message("GET /health")
///     .build();
/// assert_eq!(crumb.ty, "http");
/// assert_eq!(crumb.level, sentry::Level::Warning);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BreadcrumbRequest {
    /// The kind of breadcrumb.
    pub ty: Option<BreadcrumbType>,
    /// When the breadcrumb happened.
    pub timestamp: Option<SystemTime>,
    /// The severity.
    pub level: Option<BreadcrumbLevel>,
    /// A human readable message.
    pub message: Option<String>,
    /// A dotted category such as `ui.click`.
    pub category: Option<String>,
    /// Free-form data.
    pub data: Vec<(Datum, Datum)>,
}

impl BreadcrumbRequest {
    /// Creates an empty request.
    pub fn new() -> BreadcrumbRequest {
        Default::default()
    }

    /// Sets the kind.
    pub fn ty(mut self, ty: BreadcrumbType) -> Self {
        self.ty = Some(ty);
        self
    }

    /// Sets the timestamp.
    pub fn timestamp(mut self, timestamp: SystemTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Sets the severity.
    pub fn level(mut self, level: BreadcrumbLevel) -> Self {
        self.level = Some(level);
        self
    }

    /// Sets the message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Adds a data entry.
    pub fn data(mut self, key: impl Into<Datum>, value: impl Into<Datum>) -> Self {
        self.data.push((key.into(), value.into()));
        self
    }

    /// Builds the protocol breadcrumb.
    ///
    /// Data keys and values are both coerced to text.
    pub fn build(&self) -> Breadcrumb {
        let mut breadcrumb = Breadcrumb::default();
        if let Some(ty) = self.ty {
            breadcrumb.ty = ty.as_str().into();
        }
        if let Some(timestamp) = self.timestamp {
            breadcrumb.timestamp = timestamp;
        }
        if let Some(level) = self.level {
            breadcrumb.level = level.into();
        }
        breadcrumb.message = self.message.clone();
        breadcrumb.category = self.category.clone();
        breadcrumb.data = self
            .data
            .iter()
            .map(|(key, value)| (key.to_text(), Value::String(value.to_text())))
            .collect();
        breadcrumb
    }
}

impl TryFrom<&'_ Datum> for BreadcrumbRequest {
    type Error = Error;

    /// Reads a breadcrumb map with the keys `type`, `timestamp`, `level`,
    /// `message`, `category` and `data`.
    fn try_from(datum: &Datum) -> Result<BreadcrumbRequest, Error> {
        expect_map(datum, "breadcrumb")?;
        Ok(BreadcrumbRequest {
            ty: tag_field(datum, "type")?,
            timestamp: timestamp_field(datum, "timestamp")?,
            level: tag_field(datum, "level")?,
            message: string_field(datum, "message")?,
            category: string_field(datum, "category")?,
            data: map_field(datum, "data")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use sentry::Level;

    use super::*;

    #[test]
    fn test_empty_request_keeps_defaults() {
        let crumb = BreadcrumbRequest::new().build();
        let default = Breadcrumb::default();
        assert_eq!(crumb.ty, default.ty);
        assert_eq!(crumb.level, default.level);
        assert_eq!(crumb.message, None);
        assert_eq!(crumb.category, None);
        assert!(crumb.data.is_empty());
    }

    #[test]
    fn test_all_fields() {
        let when = UNIX_EPOCH + Duration::from_secs(1_500_000_000);
        let crumb = BreadcrumbRequest::new()
            .ty(BreadcrumbType::Navigation)
            .timestamp(when)
            .level(BreadcrumbLevel::Critical)
            .message("moved")
            .category("route")
            .data(Datum::keyword(":from"), "/a")
            .data(Datum::keyword(":attempt"), 2)
            .build();
        assert_eq!(crumb.ty, "navigation");
        assert_eq!(crumb.timestamp, when);
        assert_eq!(crumb.level, Level::Fatal);
        assert_eq!(crumb.message.as_deref(), Some("moved"));
        assert_eq!(crumb.category.as_deref(), Some("route"));
        assert_eq!(crumb.data["from"], Value::from("/a"));
        assert_eq!(crumb.data["attempt"], Value::from("2"));
    }

    #[test]
    fn test_from_datum() {
        let datum = Datum::map(vec![
            (Datum::keyword(":type"), Datum::keyword(":http")),
            (Datum::keyword(":level"), Datum::keyword(":error")),
            (Datum::keyword(":message"), Datum::from("boom")),
            (
                Datum::keyword(":data"),
                Datum::map(vec![(Datum::keyword(":status"), Datum::from(500))]),
            ),
        ]);
        let request = BreadcrumbRequest::try_from(&datum).unwrap();
        assert_eq!(request.ty, Some(BreadcrumbType::Http));
        assert_eq!(request.level, Some(BreadcrumbLevel::Error));
        assert_eq!(request.message.as_deref(), Some("boom"));
        assert_eq!(request.build().data["status"], Value::from("500"));
    }

    #[test]
    fn test_unknown_level_fails() {
        let datum = Datum::map(vec![(Datum::keyword(":level"), Datum::keyword(":loud"))]);
        assert!(matches!(
            BreadcrumbRequest::try_from(&datum),
            Err(Error::UnmappedEnumValue { .. })
        ));
    }

    #[test]
    fn test_not_a_map() {
        assert!(matches!(
            BreadcrumbRequest::try_from(&Datum::from("crumb")),
            Err(Error::InvalidValue { field: "breadcrumb", .. })
        ));
    }
}
