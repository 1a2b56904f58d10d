//! Declarative endpoint descriptions.
//!
//! An [`Endpoint`] describes one request intent: where it goes, how its
//! body or query is constructed, and optionally how to fake its response.
//! Implementations are read-only; a [`WireRequest`](crate::request::WireRequest)
//! is built fresh from the endpoint on every execution.

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use serde::Serialize;
use url::Url;

use crate::{
    encoding::{Destination, Parameters},
    error::{BoxedCause, NetworkError, UnderlyingEncodingSnafu},
    platform::Duration,
    request::CacheHint,
};

/// How a request body or query string is constructed.
///
/// Each variant selects exactly one body-construction path.
#[derive(Debug, Clone)]
pub enum Task {
    /// No body.
    Plain,
    /// The body is `data`, verbatim.
    RawBytes {
        /// The body bytes.
        data: Bytes,
    },
    /// The body is `value` serialized as JSON. `value` must be a JSON
    /// object; anything else fails the build with
    /// [`EncodingFailureReason::EncodableConversion`](crate::error::EncodingFailureReason::EncodableConversion).
    Json {
        /// The JSON object tree.
        value: serde_json::Value,
    },
    /// Form parameters, URL-encoded into the query or the body.
    Form {
        /// The parameter tree.
        parameters: Parameters,
        /// Where the encoded string lands.
        destination: Destination,
    },
}

impl Task {
    /// Builds a [`Task::Json`] from any serializable value.
    ///
    /// Serialization to the JSON tree happens here; reduction to an object
    /// is checked when the request is built.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::EncodingFailed`] if the value's `Serialize`
    /// implementation fails.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, NetworkError> {
        use snafu::ResultExt as _;

        let value = serde_json::to_value(value)
            .map_err(|e| Box::new(e) as BoxedCause)
            .context(UnderlyingEncodingSnafu)
            .map_err(|reason| NetworkError::EncodingFailed { reason })?;
        Ok(Self::Json { value })
    }
}

/// A scripted stand-in for a real network exchange.
#[derive(Debug)]
pub enum MockFixture {
    /// Complete with a fabricated response.
    FixedResponse {
        /// The response status code.
        status: StatusCode,
        /// The response body.
        body: Bytes,
    },
    /// Complete with a simulated transport failure.
    SimulatedError {
        /// The simulated failure, surfaced as
        /// [`NetworkError::Underlying`](crate::error::NetworkError::Underlying).
        error: BoxedCause,
    },
}

/// A declarative description of one HTTP request.
///
/// The provided defaults mirror common usage: no mock fixture, a
/// cache-bypassing hint, and a ten-second timeout.
pub trait Endpoint {
    /// The base address requests are resolved against.
    fn base_url(&self) -> Url;

    /// The path joined onto [`base_url`](Endpoint::base_url).
    fn path(&self) -> String;

    /// The HTTP method.
    fn method(&self) -> Method;

    /// How the body or query is constructed.
    fn task(&self) -> Task;

    /// Headers added to the request. Values accumulate: multiple entries
    /// for one name all appear on the wire.
    fn headers(&self) -> HeaderMap;

    /// The scripted response used when the dispatcher mocks this endpoint.
    fn mock_fixture(&self) -> Option<MockFixture> {
        None
    }

    /// Advisory caching hint handed to the transport.
    fn cache_hint(&self) -> CacheHint {
        CacheHint::ReloadIgnoringLocalCache
    }

    /// Per-request timeout handed to the transport.
    fn timeout(&self) -> Duration {
        Duration::from_secs(10)
    }
}
