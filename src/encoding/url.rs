//! The deterministic query-string grammar and its request encoder.

use bytes::Bytes;

use super::{ParamValue, ParameterEncoder, Parameters};
use crate::{error::NetworkError, request::WireRequest};

/// Where encoded form parameters land in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Appended to the URL's query component.
    UrlQuery,
    /// Transmitted as the request body (UTF-8 bytes of the encoded string).
    HttpBody,
}

/// How list elements are keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrayEncoding {
    /// `key[]=a&key[]=b`
    #[default]
    Brackets,
    /// `key=a&key=b`
    NoBrackets,
}

impl ArrayEncoding {
    /// Renders the key for one list element.
    #[must_use]
    pub fn encode_key(self, key: &str) -> String {
        match self {
            Self::Brackets => format!("{key}[]"),
            Self::NoBrackets => key.to_owned(),
        }
    }
}

/// How booleans are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoolEncoding {
    /// `1` / `0`
    Numeric,
    /// `true` / `false`
    #[default]
    Literal,
}

impl BoolEncoding {
    /// Renders one boolean.
    #[must_use]
    pub fn encode_flag(self, flag: bool) -> &'static str {
        match self {
            Self::Numeric => {
                if flag {
                    "1"
                } else {
                    "0"
                }
            }
            Self::Literal => {
                if flag {
                    "true"
                } else {
                    "false"
                }
            }
        }
    }
}

/// Renders a [`Parameters`] tree as `key=value` pairs joined by `&`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlEncoding {
    /// List-key policy.
    pub array_encoding: ArrayEncoding,
    /// Boolean rendering policy.
    pub bool_encoding: BoolEncoding,
}

impl UrlEncoding {
    /// Creates an encoding with the given policies.
    #[must_use]
    pub fn new(array_encoding: ArrayEncoding, bool_encoding: BoolEncoding) -> Self {
        Self {
            array_encoding,
            bool_encoding,
        }
    }

    /// Encodes `parameters` as a query string.
    ///
    /// Top-level keys are enumerated in lexicographic ascending order, so
    /// the output is deterministic for flat parameter sets. Nested maps are
    /// enumerated in their [`HashMap`](std::collections::HashMap) iteration
    /// order, which is unspecified; callers that need a reproducible string
    /// should avoid multi-entry nested maps.
    ///
    /// No percent-encoding is applied here; URL assembly escapes what the
    /// query component requires at that boundary.
    #[must_use]
    pub fn query(&self, parameters: &Parameters) -> String {
        let mut keys: Vec<&String> = parameters.keys().collect();
        keys.sort_unstable();

        let mut components = Vec::new();
        for key in keys {
            self.query_components(key, &parameters[key], &mut components);
        }

        components
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&")
    }

    fn query_components(&self, key: &str, value: &ParamValue, out: &mut Vec<(String, String)>) {
        match value {
            ParamValue::Map(inner) => {
                for (inner_key, inner_value) in inner {
                    self.query_components(&format!("{key}[{inner_key}]"), inner_value, out);
                }
            }
            ParamValue::List(elements) => {
                for element in elements {
                    self.query_components(&self.array_encoding.encode_key(key), element, out);
                }
            }
            ParamValue::Bool(flag) => {
                out.push((key.to_owned(), self.bool_encoding.encode_flag(*flag).to_owned()));
            }
            ParamValue::String(s) => out.push((key.to_owned(), s.clone())),
            ParamValue::Integer(n) => out.push((key.to_owned(), n.to_string())),
            ParamValue::Float(n) => out.push((key.to_owned(), n.to_string())),
        }
    }
}

/// Applies URL-encoded form parameters to a request.
#[derive(Debug, Clone, Copy)]
pub struct UrlParameterEncoder {
    encoding: UrlEncoding,
    destination: Destination,
}

impl UrlParameterEncoder {
    /// Creates an encoder with default policies for the given destination.
    #[must_use]
    pub fn new(destination: Destination) -> Self {
        Self {
            encoding: UrlEncoding::default(),
            destination,
        }
    }

    /// Creates an encoder with explicit policies.
    #[must_use]
    pub fn with_encoding(encoding: UrlEncoding, destination: Destination) -> Self {
        Self {
            encoding,
            destination,
        }
    }
}

impl ParameterEncoder for UrlParameterEncoder {
    type Parameters = Parameters;

    fn encode(
        &self,
        mut request: WireRequest,
        parameters: &Self::Parameters,
    ) -> Result<WireRequest, NetworkError> {
        let encoded = self.encoding.query(parameters);

        match self.destination {
            Destination::UrlQuery => {
                let combined = match request.url().query() {
                    Some(existing) if !existing.is_empty() => format!("{existing}&{encoded}"),
                    _ => encoded,
                };
                request.url_mut().set_query(Some(&combined));
            }
            Destination::HttpBody => {
                request.set_body(Some(Bytes::from(encoded.into_bytes())));
            }
        }

        Ok(request)
    }
}
