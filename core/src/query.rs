//! Query-string construction for list requests.
//!
//! # Design
//! `QueryParams` keeps insertion order so the same sequence of `push` calls
//! always yields the same string byte-for-byte. Parameters whose value is
//! absent or the empty string are dropped instead of being encoded as
//! `key=`. Numeric zero is a present value.

use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters escaped in a URI component. Matches the unreserved set kept
/// verbatim by JavaScript's `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a single key or value.
pub fn encode_component(input: &str) -> String {
    utf8_percent_encode(input, COMPONENT).to_string()
}

/// A single query parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Absent,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl QueryValue {
    /// Whether this value makes it into the encoded query.
    pub fn is_present(&self) -> bool {
        match self {
            QueryValue::Absent => false,
            QueryValue::Text(s) => !s.is_empty(),
            _ => true,
        }
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Absent => Ok(()),
            QueryValue::Text(s) => f.write_str(s),
            QueryValue::Int(n) => write!(f, "{n}"),
            QueryValue::Float(n) => write!(f, "{n}"),
            QueryValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Text(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Int(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        QueryValue::Int(value.into())
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        QueryValue::Int(value.into())
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        QueryValue::Float(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(QueryValue::Absent, Into::into)
    }
}

/// Insertion-ordered query parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pairs: Vec<(String, QueryValue)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter. Pushing the same key twice keeps both entries.
    pub fn push(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    /// Encode as `k1=v1&k2=v2`, skipping absent and empty values.
    ///
    /// Returns an empty string when nothing is present.
    pub fn encode(&self) -> String {
        self.pairs
            .iter()
            .filter(|(_, value)| value.is_present())
            .map(|(key, value)| {
                format!("{}={}", encode_component(key), encode_component(&value.to_string()))
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K: Into<String>, V: Into<QueryValue>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter().fold(QueryParams::new(), |params, (k, v)| params.push(k, v))
    }
}

/// Filters accepted by `GET /api/cars`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub keyword: Option<String>,
    pub order_by: Option<String>,
    pub sort_order: Option<String>,
}

impl ListQuery {
    pub fn to_params(&self) -> QueryParams {
        QueryParams::new()
            .push("page", self.page)
            .push("keyword", self.keyword.clone())
            .push("order_by", self.order_by.clone())
            .push("sort_order", self.sort_order.clone())
    }
}
