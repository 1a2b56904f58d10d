//! Error types for request building, dispatch, and response filtering.
//!
//! [`NetworkError`] is the single failure type surfaced to completion
//! callbacks. Underlying transport causes are type-erased as
//! `Box<dyn std::error::Error>` so the taxonomy stays closed while still
//! carrying the original failure for inspection via downcasting.

use snafu::Snafu;

use crate::response::Response;

/// A type-erased underlying cause.
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced while building or executing a request.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum NetworkError {
    /// The request could not be built; it was never attempted over the
    /// network.
    #[snafu(display("{reason}"))]
    EncodingFailed {
        /// Why encoding failed.
        reason: EncodingFailureReason,
    },

    /// A caller-invoked status filter rejected the response.
    ///
    /// Never produced automatically; only [`Response::filter`] and
    /// [`Response::filter_successful_status_codes`] construct it. Carries
    /// the full response for diagnostics.
    #[snafu(display("Status code didn't fall within the given range"))]
    StatusCode {
        /// The rejected response.
        response: Box<Response>,
    },

    /// A transport-level failure or an explicit cancellation.
    ///
    /// The two are distinguished only by the wrapped cause; cancellation
    /// wraps [`Cancelled`].
    #[snafu(display("{source}"))]
    Underlying {
        /// The underlying failure.
        source: BoxedCause,
        /// The partial response observed before the failure, if any.
        response: Option<Box<Response>>,
    },
}

/// Reasons a request could not be encoded.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum EncodingFailureReason {
    /// The endpoint's base URL and path did not resolve to a usable URL.
    #[snafu(display("Failed to get url from the request"))]
    MissingUrl,

    /// Serializing the JSON parameter object to body bytes failed.
    #[snafu(display("Failed to create JSON data object"))]
    JsonSerialization {
        /// The underlying serializer error.
        source: serde_json::Error,
    },

    /// The value handed to [`Task::json`](crate::endpoint::Task::json)
    /// could not be reduced to a JSON object.
    #[snafu(display("Failed to convert the value to a parameter object"))]
    EncodableConversion,

    /// Some other failure while encoding.
    #[snafu(display("{source}"))]
    #[snafu(context(suffix(EncodingSnafu)))]
    Underlying {
        /// The underlying failure.
        source: BoxedCause,
    },
}

/// Marker error wrapped by [`NetworkError::Underlying`] when a dispatch is
/// cancelled before it resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Snafu)]
#[snafu(display("The request was cancelled"))]
#[snafu(visibility(pub))]
pub struct Cancelled;

impl NetworkError {
    /// Whether this error is an explicit cancellation.
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        match self {
            Self::Underlying { source, .. } => source.downcast_ref::<Cancelled>().is_some(),
            Self::EncodingFailed { .. } | Self::StatusCode { .. } => false,
        }
    }
}
