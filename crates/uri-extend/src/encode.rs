//! Turning named values into `name=value` query segments.
//!
//! Per-value rules, in precedence order:
//!
//! 1. `Null` emits nothing.
//! 2. Timestamps emit one segment with the encoded round-trip rendering.
//! 3. Strings emit one segment with the encoded text.
//! 4. Sequences emit one segment per element, repeating the name.
//! 5. Booleans emit lowercase `true` / `false`.
//! 6. Everything else emits its canonical rendering, unencoded.
//!
//! Only rules 2 and 3 (and string or timestamp elements under rule 4) go
//! through the [`StringEncoder`].

use crate::query::QueryParams;
use crate::time::render_duration;
use crate::value::Value;
use url::form_urlencoded;

/// Percent-encoding applied to string values.
///
/// Any `Fn(&str) -> String` closure implements this trait.
pub trait StringEncoder: Send + Sync {
    /// Encode a single value.
    fn encode(&self, input: &str) -> String;
}

impl<F> StringEncoder for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn encode(&self, input: &str) -> String {
        self(input)
    }
}

/// `application/x-www-form-urlencoded` value serialization.
///
/// Space becomes `+`; bytes outside `A-Za-z0-9*-._` become `%XX`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FormEncoder;

impl StringEncoder for FormEncoder {
    fn encode(&self, input: &str) -> String {
        form_urlencoded::byte_serialize(input.as_bytes()).collect()
    }
}

/// Encode one field into its query segments.
///
/// Returns no segments for `Null` and for empty sequences.
pub fn encode_field(name: &str, value: &Value, encoder: &dyn StringEncoder) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::Sequence(items) => {
            let mut segments = Vec::with_capacity(items.len());
            push_elements(name, items, encoder, &mut segments);
            segments
        }
        scalar => vec![segment(name, &render_scalar(scalar, encoder))],
    }
}

/// Encode every field of `params` and join the segments with `&`.
///
/// Fields whose segments join to an empty or whitespace-only string are
/// skipped. The result carries no leading `?`.
pub fn build_query_string(params: &QueryParams, encoder: &dyn StringEncoder) -> String {
    params
        .iter()
        .map(|(name, value)| encode_field(name, value, encoder).join("&"))
        .filter(|joined| !joined.trim().is_empty())
        .collect::<Vec<_>>()
        .join("&")
}

fn segment(name: &str, rendered: &str) -> String {
    format!("{name}={rendered}")
}

fn push_elements(
    name: &str,
    items: &[Value],
    encoder: &dyn StringEncoder,
    segments: &mut Vec<String>,
) {
    for item in items {
        match item {
            // Nested sequences flatten into the same name.
            Value::Sequence(nested) => push_elements(name, nested, encoder, segments),
            Value::Null => segments.push(segment(name, "")),
            element => segments.push(segment(name, &render_scalar(element, encoder))),
        }
    }
}

fn render_scalar(value: &Value, encoder: &dyn StringEncoder) -> String {
    match value {
        Value::Null | Value::Sequence(_) => String::new(),
        Value::Timestamp(timestamp) => encoder.encode(&timestamp.to_round_trip()),
        Value::String(text) => encoder.encode(text),
        Value::Bool(flag) => flag.to_string(),
        Value::Integer(number) => number.to_string(),
        Value::Unsigned(number) => number.to_string(),
        Value::Float(number) => render_float(*number),
        Value::Duration(span) => render_duration(*span),
        Value::Display(text) => text.clone(),
    }
}

fn render_float(number: f64) -> String {
    if number.is_nan() {
        "NaN".to_string()
    } else if number.is_infinite() {
        if number.is_sign_positive() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else {
        number.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeDelta};

    fn encode(name: &str, value: impl Into<Value>) -> Vec<String> {
        encode_field(name, &value.into(), &FormEncoder)
    }

    #[test]
    fn null_emits_nothing() {
        assert!(encode("gone", Value::Null).is_empty());
        assert!(encode("gone", Option::<&str>::None).is_empty());
    }

    #[test]
    fn strings_are_form_encoded() {
        assert_eq!(encode("s", "with space"), ["s=with+space"]);
        assert_eq!(encode("s", "with#hash"), ["s=with%23hash"]);
        assert_eq!(encode("s", "# %"), ["s=%23+%25"]);
        assert_eq!(encode("s", "a&b=c"), ["s=a%26b%3Dc"]);
    }

    #[test]
    fn strings_are_never_split() {
        assert_eq!(encode("Animal", "cat"), ["Animal=cat"]);
    }

    #[test]
    fn sequences_repeat_the_name() {
        assert_eq!(
            encode("Animals", vec!["cat", "dog", "pigion"]),
            ["Animals=cat", "Animals=dog", "Animals=pigion"]
        );
        assert_eq!(encode("n", [1, 2]), ["n=1", "n=2"]);
        assert!(encode("n", Vec::<u8>::new()).is_empty());
    }

    #[test]
    fn sequence_elements_follow_scalar_rules() {
        let mixed = Value::Sequence(vec![
            Value::from(true),
            Value::from("a b"),
            Value::Null,
            Value::Sequence(vec![Value::from(3)]),
        ]);
        assert_eq!(
            encode_field("x", &mixed, &FormEncoder),
            ["x=true", "x=a+b", "x=", "x=3"]
        );
    }

    #[test]
    fn booleans_are_lowercase() {
        assert_eq!(encode("flag", true), ["flag=true"]);
        assert_eq!(encode("flag", false), ["flag=false"]);
    }

    #[test]
    fn timestamps_use_round_trip_form() {
        let today = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        assert_eq!(
            encode("d", today),
            ["d=2000-01-01T00%3A00%3A00.0000000"]
        );
    }

    #[test]
    fn other_scalars_use_canonical_rendering() {
        assert_eq!(encode("Number", 42), ["Number=42"]);
        assert_eq!(encode("big", u64::MAX), ["big=18446744073709551615"]);
        assert_eq!(encode("ratio", 0.5), ["ratio=0.5"]);
        assert_eq!(encode("whole", 3.0), ["whole=3"]);
        assert_eq!(encode("g", 0.1f32), ["g=0.1"]);
        assert_eq!(encode("g", vec![0.1f32, 2.5]), ["g=0.1", "g=2.5"]);
        assert_eq!(encode("nan", f64::NAN), ["nan=NaN"]);
        assert_eq!(encode("inf", f64::NEG_INFINITY), ["inf=-Infinity"]);
        assert_eq!(encode("Span", TimeDelta::minutes(10)), ["Span=00:10:00"]);
        assert_eq!(encode("id", Value::display("a:b")), ["id=a:b"]);
    }

    #[test]
    fn empty_fields_are_dropped_from_the_join() {
        let params = QueryParams::new()
            .with("a", "1")
            .with("empty", Vec::<String>::new())
            .with("gone", Value::Null)
            .with("b", "2");
        assert_eq!(build_query_string(&params, &FormEncoder), "a=1&b=2");
    }

    #[test]
    fn empty_string_still_emits_a_segment() {
        let params = QueryParams::new().with("q", "");
        assert_eq!(build_query_string(&params, &FormEncoder), "q=");
    }

    #[test]
    fn custom_encoder_applies_to_strings_only() {
        let upper = |input: &str| input.to_uppercase();
        let params = QueryParams::new()
            .with("s", "abc")
            .with("b", true)
            .with("n", 7);
        assert_eq!(build_query_string(&params, &upper), "s=ABC&b=true&n=7");
    }
}
