//! Conversion of nested [`Datum`] values into protocol values.
//!
//! Sentry expects extra data as a map of string keys to JSON values.  The
//! functions in this module rewrite arbitrarily nested datums into that
//! shape: keys are coerced to text and nested maps become JSON objects.
//! Both functions borrow their input and never modify it, and normalizing
//! already normalized data (fed back through `Datum::from(Value)`) yields
//! the same result.

use sentry::protocol::{Map, Value};

use crate::datum::{format_instant, Datum};

/// Normalizes a single value.
///
/// Nested sequences and maps are walked recursively, so the nesting depth
/// of `datum` is bounded by the stack of the calling thread.
///
/// ```
/// use sentry_datum::{normalize, Datum};
///
/// let datum = Datum::map(vec![(
///     Datum::keyword(":user"),
///     Datum::map(vec![(Datum::keyword(":id"), Datum::from(7))]),
/// )]);
/// assert_eq!(normalize(&datum), serde_json::json!({"user": {"id": 7}}));
/// ```
pub fn normalize(datum: &Datum) -> Value {
    match datum {
        Datum::Nil => Value::Null,
        Datum::Bool(b) => Value::Bool(*b),
        Datum::Int(i) => Value::from(*i),
        Datum::Float(f) => serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number),
        Datum::Str(s) | Datum::Keyword(s) => Value::String(s.clone()),
        Datum::Inst(t) => Value::String(format_instant(*t)),
        Datum::Seq(items) => Value::Array(items.iter().map(normalize).collect()),
        Datum::Map(entries) => Value::Object(
            entries
                .iter()
                .map(|(key, value)| (key.to_text(), normalize(value)))
                .collect(),
        ),
    }
}

/// Normalizes the entries of a map into a protocol map.
///
/// Later entries overwrite earlier ones whose keys have the same text.
pub fn normalize_map(entries: &[(Datum, Datum)]) -> Map<String, Value> {
    entries
        .iter()
        .map(|(key, value)| (key.to_text(), normalize(value)))
        .collect()
}
