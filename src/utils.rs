//! Field accessors for loosely-typed request maps.
//!
//! A missing key and a `nil` value both mean "absent".

use std::time::SystemTime;

use chrono::{DateTime, Utc};

use crate::datum::Datum;
use crate::error::Error;

pub fn expect_map(datum: &Datum, what: &'static str) -> Result<(), Error> {
    match datum {
        Datum::Map(_) => Ok(()),
        other => Err(Error::invalid(what, format!("expected a map, got {}", other))),
    }
}

pub fn field<'a>(datum: &'a Datum, key: &str) -> Option<&'a Datum> {
    datum.get(key).filter(|value| !value.is_nil())
}

pub fn string_field(datum: &Datum, key: &'static str) -> Result<Option<String>, Error> {
    match field(datum, key) {
        None => Ok(None),
        Some(value) => match value.as_str() {
            Some(s) => Ok(Some(s.to_owned())),
            None => Err(Error::invalid(key, format!("expected a string, got {}", value))),
        },
    }
}

pub fn tag_field<T>(datum: &Datum, key: &'static str) -> Result<Option<T>, Error>
where
    T: for<'a> TryFrom<&'a Datum, Error = Error>,
{
    field(datum, key)
        .map(|value| <T as TryFrom<&Datum>>::try_from(value))
        .transpose()
}

pub fn map_field(datum: &Datum, key: &'static str) -> Result<Vec<(Datum, Datum)>, Error> {
    match field(datum, key) {
        None => Ok(Vec::new()),
        Some(Datum::Map(entries)) => Ok(entries.clone()),
        Some(other) => Err(Error::invalid(key, format!("expected a map, got {}", other))),
    }
}

pub fn seq_field<'a>(datum: &'a Datum, key: &'static str) -> Result<&'a [Datum], Error> {
    match field(datum, key) {
        None => Ok(&[]),
        Some(Datum::Seq(items)) => Ok(items),
        Some(other) => Err(Error::invalid(
            key,
            format!("expected a sequence, got {}", other),
        )),
    }
}

pub fn timestamp_field(datum: &Datum, key: &'static str) -> Result<Option<SystemTime>, Error> {
    let value = match field(datum, key) {
        Some(value) => value,
        None => return Ok(None),
    };
    match value {
        Datum::Inst(t) => Ok(Some(*t)),
        Datum::Int(millis) => DateTime::<Utc>::from_timestamp_millis(*millis)
            .map(|dt| Some(SystemTime::from(dt)))
            .ok_or_else(|| Error::invalid(key, format!("{} ms is out of range", millis))),
        Datum::Str(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| Some(SystemTime::from(dt)))
            .map_err(|err| Error::invalid(key, err.to_string())),
        other => Err(Error::invalid(
            key,
            format!("expected an instant, got {}", other),
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use super::*;

    #[test]
    fn test_nil_is_absent() {
        let map = Datum::map(vec![(Datum::keyword("message"), Datum::Nil)]);
        assert_eq!(string_field(&map, "message").unwrap(), None);
        assert!(map_field(&map, "message").unwrap().is_empty());
    }

    #[test]
    fn test_timestamps() {
        let map = Datum::map(vec![
            (Datum::keyword("millis"), Datum::from(1500)),
            (Datum::keyword("text"), Datum::from("1970-01-01T00:00:02+00:00")),
            (Datum::keyword("negative"), Datum::from(-1500)),
            (Datum::keyword("huge"), Datum::from(i64::MAX)),
        ]);
        assert_eq!(
            timestamp_field(&map, "millis").unwrap(),
            Some(UNIX_EPOCH + Duration::from_millis(1500))
        );
        assert_eq!(
            timestamp_field(&map, "text").unwrap(),
            Some(UNIX_EPOCH + Duration::from_secs(2))
        );
        assert_eq!(
            timestamp_field(&map, "negative").unwrap(),
            Some(UNIX_EPOCH - Duration::from_millis(1500))
        );
        match timestamp_field(&map, "huge") {
            Err(Error::InvalidValue { field, .. }) => assert_eq!(field, "huge"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_wrong_shapes() {
        let map = Datum::map(vec![(Datum::keyword("tags"), Datum::from(vec![1]))]);
        match map_field(&map, "tags") {
            Err(Error::InvalidValue { field, .. }) => assert_eq!(field, "tags"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(string_field(&map, "tags").is_err());
        assert!(seq_field(&map, "tags").is_ok());
    }
}
