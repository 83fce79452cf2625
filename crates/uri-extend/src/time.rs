//! Timestamp and duration rendering.
//!
//! Timestamps use the round-trip form with seven fractional digits
//! (`2000-01-01T00:00:00.0000000`), durations the `[-][d.]HH:MM:SS[.fffffff]`
//! form. Both are independent of locale.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike, Utc};
use std::fmt;

const NANOS_PER_TICK: u32 = 100;
const TICKS_PER_SECOND: u32 = 10_000_000;
const SECONDS_PER_DAY: i64 = 86_400;

/// A point in time, with or without a known offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timestamp {
    /// Wall-clock time with no offset information
    Naive(NaiveDateTime),
    /// Time in UTC, rendered with a `Z` suffix
    Utc(DateTime<Utc>),
    /// Time at a fixed offset, rendered with a `+HH:MM` suffix
    Offset(DateTime<FixedOffset>),
}

impl Timestamp {
    /// Render in the round-trip form.
    #[must_use]
    pub fn to_round_trip(&self) -> String {
        match self {
            Self::Naive(naive) => render_naive(naive),
            Self::Utc(utc) => format!("{}Z", render_naive(&utc.naive_utc())),
            Self::Offset(dt) => format!("{}{}", render_naive(&dt.naive_local()), dt.format("%:z")),
        }
    }
}

fn render_naive(naive: &NaiveDateTime) -> String {
    // Leap seconds carry nanoseconds past one second; keep seven digits.
    let ticks = (naive.nanosecond() / NANOS_PER_TICK) % TICKS_PER_SECOND;
    format!("{}.{ticks:07}", naive.format("%Y-%m-%dT%H:%M:%S"))
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_round_trip())
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(value: NaiveDateTime) -> Self {
        Self::Naive(value)
    }
}

impl From<NaiveDate> for Timestamp {
    fn from(value: NaiveDate) -> Self {
        Self::Naive(value.and_time(NaiveTime::MIN))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Utc(value)
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::Offset(value)
    }
}

/// Render a duration as `[-][d.]HH:MM:SS[.fffffff]`.
///
/// The day prefix appears only for spans of at least one day and the
/// fraction only when the span has sub-second ticks.
#[must_use]
pub fn render_duration(span: TimeDelta) -> String {
    let negative = span < TimeDelta::zero();
    let span = if negative { -span } else { span };

    let total_seconds = span.num_seconds();
    let days = total_seconds / SECONDS_PER_DAY;
    let hours = (total_seconds / 3600) % 24;
    let minutes = (total_seconds / 60) % 60;
    let seconds = total_seconds % 60;
    let ticks = span.subsec_nanos().unsigned_abs() / NANOS_PER_TICK;

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    if days > 0 {
        out.push_str(&format!("{days}."));
    }
    out.push_str(&format!("{hours:02}:{minutes:02}:{seconds:02}"));
    if ticks > 0 {
        out.push_str(&format!(".{ticks:07}"));
    }
    out
}

/// Serde helpers that write timestamps in the round-trip form.
///
/// Use on record fields so they encode the same way as [`Timestamp`] values:
///
/// ```
/// use chrono::NaiveDateTime;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Filter {
///     #[serde(with = "uri_extend::round_trip")]
///     since: NaiveDateTime,
/// }
/// ```
pub mod round_trip {
    use super::Timestamp;
    use serde::Serializer;

    /// Serialize a timestamp-like value as a round-trip string.
    ///
    /// # Errors
    ///
    /// Propagates the serializer's error.
    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Clone + Into<Timestamp>,
        S: Serializer,
    {
        serializer.serialize_str(&value.clone().into().to_round_trip())
    }

    /// Same as [`serialize`](super::serialize) for optional fields.
    pub mod option {
        use super::Timestamp;
        use serde::Serializer;

        /// Serialize an optional timestamp-like value.
        ///
        /// # Errors
        ///
        /// Propagates the serializer's error.
        pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
        where
            T: Clone + Into<Timestamp>,
            S: Serializer,
        {
            match value {
                Some(value) => serializer.serialize_str(&value.clone().into().to_round_trip()),
                None => serializer.serialize_none(),
            }
        }
    }
}
