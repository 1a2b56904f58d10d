//! The completed-exchange envelope.

use std::ops::RangeBounds;

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

use crate::{error::NetworkError, request::WireRequest};

/// One completed (or partially completed) exchange.
///
/// Immutable once constructed: interceptors that rewrite a response build a
/// new value with [`Response::new`]. A mocked exchange carries the
/// fixture's status and body; a failed real exchange may carry only what
/// the transport observed before the failure.
#[derive(Debug, Clone)]
pub struct Response {
    request: WireRequest,
    body: Option<Bytes>,
    status: Option<StatusCode>,
    headers: Option<HeaderMap>,
}

impl Response {
    /// Wraps a completed exchange.
    #[must_use]
    pub fn new(
        request: WireRequest,
        body: Option<Bytes>,
        status: Option<StatusCode>,
        headers: Option<HeaderMap>,
    ) -> Self {
        Self {
            request,
            body,
            status,
            headers,
        }
    }

    /// The request this response answers.
    #[must_use]
    pub fn request(&self) -> &WireRequest {
        &self.request
    }

    /// The response body, if one was received.
    #[must_use]
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// The response status, if the exchange got far enough to have one.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// The response headers, if the exchange got far enough to have them.
    #[must_use]
    pub fn headers(&self) -> Option<&HeaderMap> {
        self.headers.as_ref()
    }

    /// Passes the response through when its status lies in `status_codes`.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::StatusCode`] carrying the full response when
    /// the status is absent or falls outside the range. Never invoked
    /// automatically; filtering is strictly opt-in.
    pub fn filter<R: RangeBounds<u16>>(self, status_codes: R) -> Result<Self, NetworkError> {
        match self.status {
            Some(status) if status_codes.contains(&status.as_u16()) => Ok(self),
            _ => Err(NetworkError::StatusCode {
                response: Box::new(self),
            }),
        }
    }

    /// Passes the response through when its status is 200–299 inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::StatusCode`] as [`Response::filter`] does.
    pub fn filter_successful_status_codes(self) -> Result<Self, NetworkError> {
        self.filter(200..=299)
    }

    /// Decodes the body as JSON into `T`.
    ///
    /// Decode failures are swallowed by contract: an absent body, malformed
    /// JSON, or a shape mismatch all yield `None` rather than an error, so
    /// call sites can chain without handling a failure case.
    #[must_use]
    pub fn decode<T: DeserializeOwned>(&self) -> Option<T> {
        let body = self.body.as_ref()?;
        serde_json::from_slice(body).ok()
    }
}
