//! A raw, string-typed view over the query string of an incoming request.
use std::borrow::Cow;

use serde_json::{Map, Value};

#[derive(Debug, Clone, Default)]
/// The percent-decoded key/value pairs found in the query string, in order of appearance.
///
/// A key can appear more than once: `?tag=a&tag=b` yields two pairs.
/// [`QueryParams::group_repeated_keys`] folds them into the shape
/// the [`Converter`](crate::converter::Converter) works with.
pub struct QueryParams<'a> {
    pairs: Vec<(Cow<'a, str>, Cow<'a, str>)>,
}

impl<'a> QueryParams<'a> {
    /// Parse a raw query string, without the leading `?`.
    ///
    /// Decoding follows `application/x-www-form-urlencoded`: `+` is a space and
    /// invalid percent-encoded sequences are replaced lossily.
    pub fn parse(query: &'a str) -> Self {
        Self {
            pairs: form_urlencoded::parse(query.as_bytes()).collect(),
        }
    }

    /// The value of the last occurrence of `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_ref())
    }

    /// The values of every occurrence of `key`, in order.
    pub fn get_all<'s>(&'s self, key: &'s str) -> impl Iterator<Item = &'s str> + 's {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_ref())
    }

    /// The number of key/value pairs, counting repeated keys once per occurrence.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_ref(), v.as_ref()))
    }

    /// Fold the pairs into a JSON object.
    ///
    /// A key that appears once maps to a string; a key that appears more than once
    /// maps to an array holding all of its values, in order of appearance.
    pub fn group_repeated_keys(&self) -> Map<String, Value> {
        let mut grouped = Map::new();
        for (key, value) in &self.pairs {
            let value = Value::String(value.clone().into_owned());
            match grouped.get_mut(key.as_ref()) {
                None => {
                    grouped.insert(key.clone().into_owned(), value);
                }
                Some(Value::Array(values)) => values.push(value),
                Some(first) => *first = Value::Array(vec![first.take(), value]),
            }
        }
        grouped
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::QueryParams;

    #[test]
    fn single_keys_map_to_strings() {
        let params = QueryParams::parse("x=1&name=Hi%20there");
        assert_eq!(
            serde_json::Value::Object(params.group_repeated_keys()),
            json!({"x": "1", "name": "Hi there"})
        );
    }

    #[test]
    fn repeated_keys_are_grouped_in_order() {
        let params = QueryParams::parse("tag=b&x=1&tag=a&tag=c");
        assert_eq!(
            serde_json::Value::Object(params.group_repeated_keys()),
            json!({"tag": ["b", "a", "c"], "x": "1"})
        );
    }

    #[test]
    fn empty_query_is_an_empty_object() {
        let params = QueryParams::parse("");
        assert!(params.is_empty());
        assert!(params.group_repeated_keys().is_empty());
    }

    #[test]
    fn plus_decodes_to_space_and_empty_values_are_kept() {
        let params = QueryParams::parse("q=hello+world&empty=");
        assert_eq!(params.get("q"), Some("hello world"));
        assert_eq!(params.get("empty"), Some(""));
        assert_eq!(params.get("missing"), None);
    }

    #[test]
    fn get_returns_the_last_occurrence() {
        let params = QueryParams::parse("id=1&id=2");
        assert_eq!(params.get("id"), Some("2"));
        assert_eq!(params.get_all("id").collect::<Vec<_>>(), vec!["1", "2"]);
        assert_eq!(params.len(), 2);
    }
}
