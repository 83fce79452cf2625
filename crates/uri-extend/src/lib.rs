//! # uri-extend
//!
//! Merge structured parameters into the query string of a URI.
//!
//! Given an absolute or relative URI reference and an ordered set of named
//! values, produce a new reference whose query holds the original parameters
//! followed by the new ones, with any fragment kept in place.
//!
//! ```
//! use uri_extend::{QueryParams, TargetUri};
//!
//! let uri = TargetUri::parse("/dir/file?a=b#fragment")?;
//! let params = QueryParams::new()
//!     .with("Animal", "cat")
//!     .with("Tags", vec!["x y", "z"])
//!     .with("Flag", true);
//!
//! let merged = uri.add_query(&params)?;
//! assert_eq!(
//!     merged.as_str(),
//!     "/dir/file?a=b&Animal=cat&Tags=x+y&Tags=z&Flag=true#fragment"
//! );
//! # Ok::<_, uri_extend::Error>(())
//! ```
//!
//! ## Modules
//!
//! - [`value`] - The closed set of parameter values
//! - [`query`] - Ordered parameter sets and the [`ToQueryParams`] seam
//! - [`record`] - Field extraction from `serde` records
//! - [`encode`] - Per-value encoding rules and the pluggable string encoder
//! - [`uri`] - Validated absolute and relative URI references
//! - [`merge`] - Splicing the encoded query into a URI
//! - [`time`] - Timestamp and duration rendering
//! - [`error`] - Error types

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod encode;
pub mod error;
pub mod merge;
pub mod query;
pub mod record;
pub mod time;
pub mod uri;
pub mod value;

// Re-export commonly used types
pub use encode::{FormEncoder, StringEncoder};
pub use error::{Error, Result};
pub use merge::{add_query, QueryMerger};
pub use query::{QueryParams, ToQueryParams};
pub use record::Record;
pub use time::{round_trip, Timestamp};
pub use uri::TargetUri;
pub use value::Value;
