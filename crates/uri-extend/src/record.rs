//! Field extraction from `serde` records.
//!
//! Records are serialized through `serde_json` with insertion order preserved,
//! so struct fields come out in declaration order. Only flat records are
//! accepted: scalar fields and sequences of scalars.

use crate::error::{Error, Result};
use crate::query::{QueryParams, ToQueryParams};
use crate::value::{widen_f32, Value};
use serde::Serialize;
use serde_json::{Map, Number, Value as Json};
use tracing::trace;

/// Adapter that exposes the fields of any serializable record.
///
/// ```
/// use serde::Serialize;
/// use uri_extend::{Record, TargetUri};
///
/// #[derive(Serialize)]
/// struct Search<'a> {
///     q: &'a str,
///     page: u32,
///     tags: Vec<&'a str>,
///     cursor: Option<String>,
/// }
///
/// let uri = TargetUri::parse("/search#results")?;
/// let search = Search { q: "rust uri", page: 2, tags: vec!["a", "b"], cursor: None };
/// let merged = uri.add_query(&Record(&search))?;
/// assert_eq!(merged.as_str(), "/search?q=rust+uri&page=2&tags=a&tags=b#results");
/// # Ok::<_, uri_extend::Error>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Record<'a, T: ?Sized>(pub &'a T);

impl<T: Serialize + ?Sized> ToQueryParams for Record<'_, T> {
    fn to_query_params(&self) -> Result<QueryParams> {
        match serde_json::to_value(self.0)? {
            Json::Object(fields) => fields.to_query_params(),
            // A unit record has no fields.
            Json::Null => Ok(QueryParams::new()),
            other => Err(Error::UnsupportedValue(format!(
                "expected a struct or map, found {}",
                kind(&other)
            ))),
        }
    }
}

impl ToQueryParams for Map<String, Json> {
    fn to_query_params(&self) -> Result<QueryParams> {
        let mut params = QueryParams::new();
        for (name, value) in self {
            params.push(name.as_str(), field_value(name, value)?);
        }
        trace!("Extracted {} record fields", params.len());
        Ok(params)
    }
}

fn field_value(name: &str, value: &Json) -> Result<Value> {
    match value {
        Json::Array(items) => items
            .iter()
            .map(|item| match item {
                Json::Array(_) | Json::Object(_) => Err(Error::UnsupportedValue(format!(
                    "field `{name}` holds a nested {}",
                    kind(item)
                ))),
                scalar => Ok(scalar_value(scalar)),
            })
            .collect::<Result<Vec<_>>>()
            .map(Value::Sequence),
        Json::Object(_) => Err(Error::UnsupportedValue(format!(
            "field `{name}` holds a nested object"
        ))),
        scalar => Ok(scalar_value(scalar)),
    }
}

fn scalar_value(value: &Json) -> Value {
    match value {
        Json::Bool(flag) => Value::Bool(*flag),
        Json::Number(number) => number_value(number),
        Json::String(text) => Value::String(text.clone()),
        Json::Null | Json::Array(_) | Json::Object(_) => Value::Null,
    }
}

fn number_value(number: &Number) -> Value {
    if let Some(signed) = number.as_i64() {
        Value::Integer(signed)
    } else if let Some(unsigned) = number.as_u64() {
        Value::Unsigned(unsigned)
    } else {
        number.as_f64().map_or(Value::Null, |float| Value::Float(narrow_float(float)))
    }
}

/// serde_json widens `f32` fields to `f64`; a value that is exactly an `f32`
/// renders through its shortest `f32` form.
fn narrow_float(float: f64) -> f64 {
    #[allow(clippy::cast_possible_truncation)]
    let narrow = float as f32;
    if f64::from(narrow).to_bits() == float.to_bits() {
        widen_f32(narrow)
    } else {
        float
    }
}

const fn kind(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "sequence",
        Json::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Listing {
        zone: &'static str,
        enabled: bool,
        limit: Option<u32>,
        owner: Option<String>,
        ids: Vec<u64>,
        ratio: f64,
    }

    #[test]
    fn struct_fields_keep_declaration_order() {
        let listing = Listing {
            zone: "us east",
            enabled: true,
            limit: Some(25),
            owner: None,
            ids: vec![3, 1],
            ratio: -0.25,
        };
        let params = Record(&listing).to_query_params().unwrap();
        let names: Vec<&str> = params.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["zone", "enabled", "limit", "owner", "ids", "ratio"]);
        assert_eq!(
            params.to_query_string(),
            "zone=us+east&enabled=true&limit=25&ids=3&ids=1&ratio=-0.25"
        );
    }

    #[test]
    fn f32_fields_render_without_widening_noise() {
        #[derive(Serialize)]
        struct Gauge {
            g: f32,
            exact: f64,
        }

        let gauge = Gauge { g: 0.1, exact: 0.1 };
        assert_eq!(
            Record(&gauge).to_query_params().unwrap().to_query_string(),
            "g=0.1&exact=0.1"
        );
    }

    #[test]
    fn timestamps_via_round_trip_helper() {
        #[derive(Serialize)]
        struct Since {
            #[serde(with = "crate::round_trip")]
            since: NaiveDateTime,
        }

        let since = Since {
            since: NaiveDate::from_ymd_opt(2000, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        };
        assert_eq!(
            Record(&since).to_query_params().unwrap().to_query_string(),
            "since=2000-01-01T00%3A00%3A00.0000000"
        );
    }

    #[test]
    fn maps_are_records_too() {
        let mut map = BTreeMap::new();
        map.insert("b", 2);
        map.insert("a", 1);
        assert_eq!(
            Record(&map).to_query_params().unwrap().to_query_string(),
            "a=1&b=2"
        );
    }

    #[test]
    fn unit_record_is_empty() {
        #[derive(Serialize)]
        struct Nothing;

        assert!(Record(&Nothing).to_query_params().unwrap().is_empty());
    }

    #[test]
    fn nested_shapes_are_rejected() {
        #[derive(Serialize)]
        struct Inner {
            x: u8,
        }
        #[derive(Serialize)]
        struct Outer {
            inner: Inner,
        }
        #[derive(Serialize)]
        struct Grid {
            rows: Vec<Vec<u8>>,
        }

        let err = Record(&Outer { inner: Inner { x: 1 } })
            .to_query_params()
            .unwrap_err();
        assert_eq!(
            err,
            Error::UnsupportedValue("field `inner` holds a nested object".to_string())
        );

        let err = Record(&Grid {
            rows: vec![vec![1]],
        })
        .to_query_params()
        .unwrap_err();
        assert_eq!(
            err,
            Error::UnsupportedValue("field `rows` holds a nested sequence".to_string())
        );
    }

    #[test]
    fn non_record_values_are_rejected() {
        let err = Record(&42).to_query_params().unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_VALUE");
        assert!(err.to_string().contains("found number"));
    }
}
