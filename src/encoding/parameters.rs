//! The structured parameter tree consumed by the URL encoder.

use std::collections::HashMap;

/// A top-level mapping of parameter names to values.
pub type Parameters = HashMap<String, ParamValue>;

/// A single parameter value.
///
/// Values nest: a [`Map`](ParamValue::Map) expands into `key[inner]` pairs
/// and a [`List`](ParamValue::List) into one pair per element.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// A string scalar.
    String(String),
    /// An integer scalar.
    Integer(i64),
    /// A floating-point scalar.
    Float(f64),
    /// A boolean, rendered per [`BoolEncoding`](super::BoolEncoding).
    Bool(bool),
    /// A nested mapping. Enumeration order of the inner map is
    /// unspecified; see [`UrlEncoding::query`](super::UrlEncoding::query).
    Map(HashMap<String, ParamValue>),
    /// An ordered list, rendered per [`ArrayEncoding`](super::ArrayEncoding).
    List(Vec<ParamValue>),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<V: Into<ParamValue>> From<Vec<V>> for ParamValue {
    fn from(values: Vec<V>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<V: Into<ParamValue>> From<HashMap<String, V>> for ParamValue {
    fn from(values: HashMap<String, V>) -> Self {
        Self::Map(values.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<V: Into<ParamValue>> FromIterator<(String, V)> for ParamValue {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        Self::Map(iter.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}
