//! A [`Transport`] backed by `reqwest`.

use super::{Transport, TransportError};
use crate::{request::WireRequest, response::Response};

impl Transport for reqwest::Client {
    /// The error type is `reqwest::Error`.
    type Error = reqwest::Error;

    /// Executes a [`WireRequest`] using the `reqwest::Client`.
    ///
    /// The per-request timeout is applied; the cache hint is ignored since
    /// `reqwest` performs no caching. A failure while reading the body
    /// still yields the partial response (status and headers) observed
    /// before it.
    async fn send(
        &self,
        request: WireRequest,
    ) -> Result<Response, TransportError<Self::Error>> {
        let mut builder = self
            .request(request.method().clone(), request.url().clone())
            .headers(request.headers().clone())
            .timeout(request.timeout());
        if let Some(body) = request.body() {
            builder = builder.body(body.clone());
        }
        let reqwest_request = match builder.build() {
            Ok(built) => built,
            Err(source) => {
                return Err(TransportError {
                    source,
                    response: None,
                });
            }
        };

        match reqwest::Client::execute(self, reqwest_request).await {
            Err(source) => Err(TransportError {
                source,
                response: None,
            }),
            Ok(response) => {
                let status = response.status();
                let headers = response.headers().clone();
                match response.bytes().await {
                    Ok(body) => Ok(Response::new(
                        request,
                        Some(body),
                        Some(status),
                        Some(headers),
                    )),
                    Err(source) => Err(TransportError {
                        source,
                        response: Some(Response::new(request, None, Some(status), Some(headers))),
                    }),
                }
            }
        }
    }
}
