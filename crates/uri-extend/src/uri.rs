//! Absolute and relative URI references.

use crate::error::{Error, Result};
use crate::merge::QueryMerger;
use crate::query::ToQueryParams;
use fluent_uri::{Uri, UriRef};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// A validated URI reference that knows whether it is absolute.
///
/// Absolute means the text parses as an RFC 3986 URI (it has a scheme);
/// relative means it only parses as a URI reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetUri {
    text: String,
    absolute: bool,
}

impl TargetUri {
    /// Parse and validate a URI reference.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUri`] if the text is not a valid URI reference.
    pub fn parse(input: &str) -> Result<Self> {
        if Uri::parse(input).is_ok() {
            return Ok(Self::absolute_unchecked(input.to_owned()));
        }
        UriRef::parse(input).map_err(|e| Error::invalid_uri(input, e))?;
        Ok(Self::relative_unchecked(input.to_owned()))
    }

    /// Parse text that must be an absolute URI.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUri`] if the text is invalid or has no scheme.
    pub fn parse_absolute(input: &str) -> Result<Self> {
        Uri::parse(input).map_err(|e| Error::invalid_uri(input, e))?;
        Ok(Self::absolute_unchecked(input.to_owned()))
    }

    /// Parse text that must be a relative reference.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUri`] if the text is invalid or has a scheme.
    pub fn parse_relative(input: &str) -> Result<Self> {
        let target = Self::parse(input)?;
        if target.absolute {
            return Err(Error::invalid_uri(input, "expected a relative reference"));
        }
        Ok(target)
    }

    const fn absolute_unchecked(text: String) -> Self {
        Self {
            text,
            absolute: true,
        }
    }

    const fn relative_unchecked(text: String) -> Self {
        Self {
            text,
            absolute: false,
        }
    }

    /// Returns true if the reference has a scheme.
    #[must_use]
    pub const fn is_absolute(&self) -> bool {
        self.absolute
    }

    /// Returns the reference text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consume the reference and return its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }

    /// Returns a new reference with `params` merged into its query, using the
    /// default form encoder.
    ///
    /// # Errors
    ///
    /// See [`QueryMerger::add_query`].
    pub fn add_query<P>(&self, params: &P) -> Result<Self>
    where
        P: ToQueryParams + ?Sized,
    {
        QueryMerger::new().add_query(self, params)
    }

    /// Convert an absolute reference into a [`Url`].
    ///
    /// `Url` normalizes its input, so default ports are dropped here.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUri`] for relative references or text the
    /// `url` crate rejects.
    pub fn to_url(&self) -> Result<Url> {
        if !self.absolute {
            return Err(Error::invalid_uri(&self.text, "relative reference has no base"));
        }
        Ok(Url::parse(&self.text)?)
    }
}

impl FromStr for TargetUri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for TargetUri {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl TryFrom<&Url> for TargetUri {
    type Error = Error;

    fn try_from(value: &Url) -> Result<Self> {
        Self::parse_absolute(value.as_str())
    }
}

impl AsRef<str> for TargetUri {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for TargetUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
