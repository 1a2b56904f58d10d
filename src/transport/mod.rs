//! The transport seam.
//!
//! This module defines the trait that decouples the dispatcher from any
//! specific HTTP implementation. Users provide their own [`Transport`]
//! (e.g. backed by `reqwest`, or the bundled implementation behind the
//! `transport-reqwest` feature) and the dispatcher operates against the
//! trait. Socket I/O, TLS handshakes, and connection pooling all live on
//! the far side of this boundary.

#[cfg(all(
    not(target_arch = "wasm32"),
    feature = "transport-reqwest"
))]
mod reqwest;

use snafu::Snafu;

use crate::{
    platform::{MaybeSend, MaybeSendSync},
    request::WireRequest,
    response::Response,
};

/// Performs one request/response exchange.
pub trait Transport: MaybeSendSync {
    /// The error type returned for a failed exchange.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Executes a fully built request and returns the completed exchange.
    ///
    /// Implementations construct the [`Response`] envelope themselves so a
    /// failure can still carry whatever arrived before it.
    fn send(
        &self,
        request: WireRequest,
    ) -> impl Future<Output = Result<Response, TransportError<Self::Error>>> + MaybeSend;
}

/// A failed exchange, optionally carrying the partial response observed
/// before the failure.
///
/// Not an error type of its own: the dispatcher unwraps it into
/// [`NetworkError::Underlying`](crate::error::NetworkError::Underlying).
#[derive(Debug)]
pub struct TransportError<E> {
    /// The transport-level cause.
    pub source: E,
    /// What was observed before the failure, if anything.
    pub response: Option<Response>,
}

/// The failure produced by [`NoTransport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Snafu)]
#[snafu(display("No transport is configured for this dispatcher"))]
#[snafu(visibility(pub))]
pub struct TransportUnavailable;

/// A placeholder transport for fully mocked dispatchers.
///
/// Dispatchers whose mock behavior never reaches the network don't need a
/// real transport; this one fails every send with [`TransportUnavailable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTransport;

impl Transport for NoTransport {
    type Error = TransportUnavailable;

    async fn send(
        &self,
        _request: WireRequest,
    ) -> Result<Response, TransportError<Self::Error>> {
        Err(TransportError {
            source: TransportUnavailable,
            response: None,
        })
    }
}
