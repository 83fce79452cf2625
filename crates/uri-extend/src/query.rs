//! Ordered parameter sets and the trait that produces them.
//!
//! [`QueryParams`] is the builder callers fill in declaration order;
//! [`ToQueryParams`] is the seam every parameter source goes through before
//! encoding.

use crate::encode::{build_query_string, FormEncoder};
use crate::error::Result;
use crate::value::Value;

/// Builder for an ordered list of named parameter values.
///
/// Order of insertion is the order of the encoded query. Keys are not
/// deduplicated.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct QueryParams {
    fields: Vec<(String, Value)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Append a named value.
    pub fn push<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.fields.push((key.into(), value.into()));
    }

    /// Append a key/value pair when the value is present.
    pub fn push_opt<K, V>(&mut self, key: K, value: Option<V>)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    /// Append using a mapping function when the value is present.
    pub fn push_opt_with<K, T, F, V>(&mut self, key: K, value: Option<T>, map: F)
    where
        K: Into<String>,
        F: FnOnce(T) -> V,
        V: Into<Value>,
    {
        if let Some(value) = value {
            self.push(key, map(value));
        }
    }

    /// Chaining form of [`push`](Self::push).
    #[must_use]
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.push(key, value);
        self
    }

    /// Iterate over the fields in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Return the collected fields.
    #[must_use]
    pub fn into_fields(self) -> Vec<(String, Value)> {
        self.fields
    }

    /// Number of fields, including null ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Encode with the default form encoder, without a leading `?`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        build_query_string(self, &FormEncoder)
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        params.extend(iter);
        params
    }
}

impl<K, V> Extend<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<Value>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.push(key, value);
        }
    }
}

/// A source of named parameter values.
///
/// Implement this for request types the same way a `to_pairs` helper would be
/// written: push every field in declaration order, leaving `None` fields as
/// nulls or skipping them.
pub trait ToQueryParams {
    /// Produce the ordered fields of this source.
    ///
    /// # Errors
    ///
    /// Returns an error when the source cannot be flattened into scalar or
    /// sequence fields.
    fn to_query_params(&self) -> Result<QueryParams>;
}

impl ToQueryParams for QueryParams {
    fn to_query_params(&self) -> Result<QueryParams> {
        Ok(self.clone())
    }
}

impl<T: ToQueryParams + ?Sized> ToQueryParams for &T {
    fn to_query_params(&self) -> Result<QueryParams> {
        (**self).to_query_params()
    }
}

impl<K, V> ToQueryParams for [(K, V)]
where
    K: AsRef<str>,
    V: Clone + Into<Value>,
{
    fn to_query_params(&self) -> Result<QueryParams> {
        Ok(self
            .iter()
            .map(|(key, value)| (key.as_ref(), value.clone()))
            .collect())
    }
}

impl<K, V> ToQueryParams for Vec<(K, V)>
where
    K: AsRef<str>,
    V: Clone + Into<Value>,
{
    fn to_query_params(&self) -> Result<QueryParams> {
        self.as_slice().to_query_params()
    }
}

impl<K, V, const N: usize> ToQueryParams for [(K, V); N]
where
    K: AsRef<str>,
    V: Clone + Into<Value>,
{
    fn to_query_params(&self) -> Result<QueryParams> {
        self.as_slice().to_query_params()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_opt_keeps_present_nulls_until_encoding() {
        let mut params = QueryParams::new();
        params.push_opt("absent", Option::<Value>::None);
        params.push_opt("explicit_null", Some(Value::Null));
        params.push_opt("owner", Some("ops team"));

        assert_eq!(params.len(), 2);
        assert_eq!(params.to_query_string(), "owner=ops+team");
    }

    #[test]
    fn push_opt_with_can_expand_into_a_sequence() {
        let mut params = QueryParams::new();
        params.push_opt_with("tag", Some("red,green"), |csv: &str| {
            csv.split(',').map(str::to_owned).collect::<Vec<_>>()
        });
        params.push_opt_with("skip", Option::<&str>::None, |csv: &str| csv.len());

        assert_eq!(params.to_query_string(), "tag=red&tag=green");
    }

    #[test]
    fn order_is_insertion_order() {
        let params = QueryParams::new()
            .with("zeta", 1)
            .with("alpha", 2)
            .with("zeta", 3);
        let names: Vec<&str> = params.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["zeta", "alpha", "zeta"]);
    }

    #[test]
    fn pair_lists_convert_in_order() {
        let pairs = [("b", "2"), ("a", "1")];
        let params = pairs.to_query_params().unwrap();
        assert_eq!(params.to_query_string(), "b=2&a=1");

        let owned = vec![("limit".to_string(), Value::from(10u32))];
        assert_eq!(owned.to_query_params().unwrap().to_query_string(), "limit=10");
    }

    #[test]
    fn null_fields_are_kept_until_encoding() {
        let params: QueryParams = vec![("gone", Value::Null), ("kept", Value::from(true))]
            .into_iter()
            .collect();
        assert_eq!(params.len(), 2);
        assert_eq!(params.to_query_string(), "kept=true");
    }
}
