use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, SecondsFormat, Utc};
use sentry::protocol::Value;

/// A loosely-typed value.
///
/// This is the shape of data handed to this crate: nested maps keyed by
/// keywords or strings, sequences and scalars.  Maps are association lists
/// that keep insertion order.  When a key occurs more than once the later
/// entry wins, both on lookup and when the map is normalized.
///
/// ```
/// use sentry_datum::Datum;
///
/// let tags = Datum::map(vec![
///     (Datum::keyword(":retries"), Datum::from(3)),
///     (Datum::keyword(":ok"), Datum::from(true)),
/// ]);
/// assert_eq!(tags.get("retries"), Some(&Datum::Int(3)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Datum {
    /// The absent value.
    #[default]
    Nil,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    Str(String),
    /// A symbolic tag, stored by name without the leading colon.
    Keyword(String),
    /// A point in time.
    Inst(SystemTime),
    /// An ordered sequence.
    Seq(Vec<Datum>),
    /// An ordered association list.
    Map(Vec<(Datum, Datum)>),
}

impl Datum {
    /// Creates a keyword.  A leading `:` is optional.
    pub fn keyword(name: &str) -> Datum {
        Datum::Keyword(name.strip_prefix(':').unwrap_or(name).to_owned())
    }

    /// Creates a map from key/value pairs.
    pub fn map<K, V, I>(entries: I) -> Datum
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Datum>,
        V: Into<Datum>,
    {
        Datum::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Returns `true` for [`Datum::Nil`].
    pub fn is_nil(&self) -> bool {
        matches!(self, Datum::Nil)
    }

    /// Returns the text of a string or the name of a keyword.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Datum::Str(s) | Datum::Keyword(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the entries of a map.
    pub fn as_map(&self) -> Option<&[(Datum, Datum)]> {
        match self {
            Datum::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up a map entry by the textual form of its key.
    ///
    /// `get("retries")` finds both `:retries` and `"retries"`.  Returns
    /// `None` if this is not a map or the key is missing.
    pub fn get(&self, name: &str) -> Option<&Datum> {
        self.as_map()?
            .iter()
            .rev()
            .find(|(key, _)| match key.as_str() {
                Some(key) => key == name,
                None => key.to_text() == name,
            })
            .map(|(_, value)| value)
    }

    /// Coerces the value into plain text.
    ///
    /// Strings come out verbatim, keywords by name, nil as the empty string
    /// and instants as RFC 3339 in UTC.  Instants outside the calendar range
    /// render as signed seconds since the epoch.  Sequences and maps use the
    /// same rendering as `Display`.
    pub fn to_text(&self) -> String {
        match self {
            Datum::Nil => String::new(),
            Datum::Bool(b) => b.to_string(),
            Datum::Int(i) => i.to_string(),
            Datum::Float(f) => f.to_string(),
            Datum::Str(s) | Datum::Keyword(s) => s.clone(),
            Datum::Inst(t) => format_instant(*t),
            Datum::Seq(_) | Datum::Map(_) => self.to_string(),
        }
    }
}

pub(crate) fn format_instant(t: SystemTime) -> String {
    let (before_epoch, offset) = match t.duration_since(UNIX_EPOCH) {
        Ok(offset) => (false, offset),
        Err(err) => (true, err.duration()),
    };
    let datetime = i64::try_from(offset.as_secs()).ok().and_then(|secs| {
        let (secs, nanos) = match (before_epoch, offset.subsec_nanos()) {
            (false, nanos) => (secs, nanos),
            (true, 0) => (-secs, 0),
            (true, nanos) => (-secs - 1, 1_000_000_000 - nanos),
        };
        DateTime::<Utc>::from_timestamp(secs, nanos)
    });
    match datetime {
        Some(datetime) => datetime.to_rfc3339_opts(SecondsFormat::Millis, true),
        None if before_epoch => format!("-{}", offset.as_secs()),
        None => offset.as_secs().to_string(),
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Nil => write!(f, "nil"),
            Datum::Bool(b) => write!(f, "{}", b),
            Datum::Int(i) => write!(f, "{}", i),
            Datum::Float(x) => write!(f, "{}", x),
            Datum::Str(s) => write!(f, "{:?}", s),
            Datum::Keyword(k) => write!(f, ":{}", k),
            Datum::Inst(t) => write!(f, "#inst {:?}", format_instant(*t)),
            Datum::Seq(items) => {
                write!(f, "[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Datum::Map(entries) => {
                write!(f, "{{")?;
                for (idx, (key, value)) in entries.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for Datum {
    fn from(value: bool) -> Datum {
        Datum::Bool(value)
    }
}

impl From<i32> for Datum {
    fn from(value: i32) -> Datum {
        Datum::Int(value.into())
    }
}

impl From<i64> for Datum {
    fn from(value: i64) -> Datum {
        Datum::Int(value)
    }
}

impl From<u32> for Datum {
    fn from(value: u32) -> Datum {
        Datum::Int(value.into())
    }
}

impl From<f64> for Datum {
    fn from(value: f64) -> Datum {
        Datum::Float(value)
    }
}

impl From<&'_ str> for Datum {
    fn from(value: &str) -> Datum {
        Datum::Str(value.to_owned())
    }
}

impl From<String> for Datum {
    fn from(value: String) -> Datum {
        Datum::Str(value)
    }
}

impl From<SystemTime> for Datum {
    fn from(value: SystemTime) -> Datum {
        Datum::Inst(value)
    }
}

impl<T: Into<Datum>> From<Vec<T>> for Datum {
    fn from(value: Vec<T>) -> Datum {
        Datum::Seq(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Datum>> From<Option<T>> for Datum {
    fn from(value: Option<T>) -> Datum {
        value.map_or(Datum::Nil, Into::into)
    }
}

impl From<Value> for Datum {
    fn from(value: Value) -> Datum {
        match value {
            Value::Null => Datum::Nil,
            Value::Bool(b) => Datum::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Datum::Int(i),
                None => n.as_f64().map_or(Datum::Nil, Datum::Float),
            },
            Value::String(s) => Datum::Str(s),
            Value::Array(items) => Datum::Seq(items.into_iter().map(Datum::from).collect()),
            Value::Object(entries) => Datum::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (Datum::Str(k), Datum::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use super::*;

    #[test]
    fn test_keyword_strips_colon() {
        assert_eq!(Datum::keyword(":retries"), Datum::keyword("retries"));
        assert_eq!(Datum::keyword(":http/status").to_text(), "http/status");
    }

    #[test]
    fn test_text_coercion() {
        assert_eq!(Datum::from(3).to_text(), "3");
        assert_eq!(Datum::from(true).to_text(), "true");
        assert_eq!(Datum::from(1.5).to_text(), "1.5");
        assert_eq!(Datum::Nil.to_text(), "");
        assert_eq!(Datum::keyword(":ok").to_text(), "ok");
        assert_eq!(Datum::from("plain").to_text(), "plain");
        assert_eq!(
            Datum::from(UNIX_EPOCH + Duration::from_millis(1500)).to_text(),
            "1970-01-01T00:00:01.500Z"
        );
        assert_eq!(
            Datum::map(vec![(Datum::keyword("a"), Datum::from(vec!["x", "y"]))]).to_text(),
            r#"{:a ["x" "y"]}"#
        );
    }

    #[test]
    fn test_instants_around_the_calendar_range() {
        let before = UNIX_EPOCH - Duration::from_millis(1500);
        assert_eq!(Datum::from(before).to_text(), "1969-12-31T23:59:58.500Z");

        let far = UNIX_EPOCH + Duration::from_millis(i64::MAX as u64);
        assert_eq!(Datum::Inst(far).to_text(), "9223372036854775");
        assert_eq!(Datum::Inst(far).to_string(), r#"#inst "9223372036854775""#);
    }

    #[test]
    fn test_default_is_nil() {
        assert!(Datum::default().is_nil());
    }

    #[test]
    fn test_get_last_entry_wins() {
        let map = Datum::Map(vec![
            (Datum::keyword("code"), Datum::from(1)),
            (Datum::from("code"), Datum::from(2)),
        ]);
        assert_eq!(map.get("code"), Some(&Datum::Int(2)));
        assert_eq!(map.get("missing"), None);
        assert_eq!(Datum::from(1).get("code"), None);
    }

    #[test]
    fn test_get_non_text_key() {
        let map = Datum::map(vec![(Datum::from(42), Datum::from("answer"))]);
        assert_eq!(map.get("42"), Some(&Datum::from("answer")));
    }

    #[test]
    fn test_from_json() {
        let value = serde_json::json!({"a": [1, 2.5, null], "b": "c"});
        let datum = Datum::from(value);
        assert_eq!(
            datum.get("a"),
            Some(&Datum::Seq(vec![
                Datum::Int(1),
                Datum::Float(2.5),
                Datum::Nil
            ]))
        );
        assert_eq!(datum.get("b"), Some(&Datum::from("c")));
    }
}
