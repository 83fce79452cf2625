//! Splicing encoded parameters into an existing URI.
//!
//! Absolute URIs are decomposed and rebuilt: existing query first, new
//! segments appended, fragment kept last. Relative references are treated as
//! opaque text and spliced at the first `#`.

use crate::encode::{build_query_string, FormEncoder, StringEncoder};
use crate::error::{Error, Result};
use crate::query::ToQueryParams;
use crate::uri::TargetUri;
use fluent_uri::Uri;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Merges parameter sets into URIs.
///
/// The string encoder is the only configurable part; everything else follows
/// fixed rules. Cloning is cheap and the merger can be shared across threads.
#[derive(Clone)]
pub struct QueryMerger {
    encoder: Arc<dyn StringEncoder>,
}

impl QueryMerger {
    /// Create a merger using form encoding for string values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            encoder: Arc::new(FormEncoder),
        }
    }

    /// Replace the encoder used for string and timestamp values.
    #[must_use]
    pub fn with_encoder<E>(mut self, encoder: E) -> Self
    where
        E: StringEncoder + 'static,
    {
        self.encoder = Arc::new(encoder);
        self
    }

    /// Encode `params` into a query string without a leading `?`.
    ///
    /// # Errors
    ///
    /// Returns an error if `params` cannot produce its fields.
    pub fn query_string<P>(&self, params: &P) -> Result<String>
    where
        P: ToQueryParams + ?Sized,
    {
        let params = params.to_query_params()?;
        Ok(build_query_string(&params, self.encoder.as_ref()))
    }

    /// Return a new URI with `params` appended to its query.
    ///
    /// The result has the same kind (absolute or relative) as `uri`. When
    /// `params` encodes to nothing, `uri` is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if `params` cannot produce its fields, if the port of
    /// an absolute URI is not a valid number, or if the spliced text no longer
    /// parses (for example when a custom encoder emits `#` or spaces).
    pub fn add_query<P>(&self, uri: &TargetUri, params: &P) -> Result<TargetUri>
    where
        P: ToQueryParams + ?Sized,
    {
        let query = self.query_string(params)?;
        if query.is_empty() {
            debug!("No parameters to merge into {}", uri);
            return Ok(uri.clone());
        }

        if uri.is_absolute() {
            let merged = merge_absolute(uri.as_str(), &query)?;
            trace!("Merged query into absolute URI: {} -> {}", uri, merged);
            TargetUri::parse_absolute(&merged)
        } else {
            let merged = merge_relative(uri.as_str(), &query);
            trace!("Merged query into relative URI: {} -> {}", uri, merged);
            TargetUri::parse_relative(&merged)
        }
    }
}

impl Default for QueryMerger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for QueryMerger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryMerger").finish_non_exhaustive()
    }
}

/// Merge `params` into `uri` with the default form encoder.
///
/// # Errors
///
/// See [`QueryMerger::add_query`].
pub fn add_query<P>(uri: &TargetUri, params: &P) -> Result<TargetUri>
where
    P: ToQueryParams + ?Sized,
{
    QueryMerger::new().add_query(uri, params)
}

/// Default port for schemes that have one.
fn default_port(scheme: &str) -> Option<u16> {
    match scheme.to_ascii_lowercase().as_str() {
        "http" | "ws" => Some(80),
        "https" | "wss" => Some(443),
        "ftp" => Some(21),
        "gopher" => Some(70),
        "nntp" => Some(119),
        "telnet" => Some(23),
        "ldap" => Some(389),
        _ => None,
    }
}

/// Decide which port, if any, to write back into the authority.
///
/// The port is kept only when the authority text literally ends with the
/// resolved port number; a port that was only implied by the scheme is
/// omitted. The comparison is textual, so a host such as `host80` with no
/// port still ends with `80` and keeps it.
fn retained_port(authority: &str, explicit: Option<u16>, scheme: &str) -> Option<u16> {
    let resolved = explicit.or_else(|| default_port(scheme))?;
    authority
        .ends_with(&resolved.to_string())
        .then_some(resolved)
}

fn merge_absolute(text: &str, query: &str) -> Result<String> {
    let uri = Uri::parse(text).map_err(|e| Error::invalid_uri(text, e))?;
    let scheme = uri.scheme().as_str();

    let mut out = String::with_capacity(text.len() + query.len() + 2);
    out.push_str(scheme);
    out.push(':');

    let mut path = uri.path().as_str();
    if let Some(authority) = uri.authority() {
        let explicit = authority
            .port_to_u16()
            .map_err(|e| Error::invalid_uri(text, format!("invalid port: {e}")))?;

        out.push_str("//");
        if let Some(userinfo) = authority.userinfo() {
            out.push_str(userinfo.as_str());
            out.push('@');
        }
        out.push_str(authority.host());
        if let Some(port) = retained_port(authority.as_str(), explicit, scheme) {
            out.push(':');
            out.push_str(&port.to_string());
        }
        if path.is_empty() {
            path = "/";
        }
    }
    out.push_str(path);

    out.push('?');
    match uri.query().map(|existing| existing.as_str()) {
        Some(existing) if !existing.trim().is_empty() => {
            out.push_str(existing);
            out.push('&');
            out.push_str(query);
        }
        _ => out.push_str(query),
    }

    if let Some(fragment) = uri.fragment() {
        out.push('#');
        out.push_str(fragment.as_str());
    }
    Ok(out)
}

/// Insert `query` before the first `#`, after an existing query if the text
/// before the `#` has one.
fn merge_relative(text: &str, query: &str) -> String {
    let insert_at = text.find('#').unwrap_or(text.len());
    let (head, fragment) = text.split_at(insert_at);
    let separator = if head.contains('?') { '&' } else { '?' };
    format!("{head}{separator}{query}{fragment}")
}
