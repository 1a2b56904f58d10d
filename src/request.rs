//! The wire request and the builder that produces it from an endpoint.

use bytes::Bytes;
use http::{HeaderMap, Method};
use url::Url;

use crate::{
    encoding::{JsonParameterEncoder, ParameterEncoder as _, UrlParameterEncoder},
    endpoint::{Endpoint, Task},
    error::{EncodingFailureReason, NetworkError},
    platform::Duration,
};

/// Advisory caching behavior for a request.
///
/// A hint only: transports that do not cache are free to ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheHint {
    /// Defer to the protocol's caching rules.
    UseProtocolPolicy,
    /// Bypass any locally cached data.
    ReloadIgnoringLocalCache,
    /// Use cached data when available, load otherwise.
    ReturnCacheDataElseLoad,
    /// Use cached data only; never load.
    ReturnCacheDataDontLoad,
}

/// A fully resolved request, ready for a transport.
///
/// Built fresh per execution and never shared between executions.
/// Interceptors receive ownership and hand back the (possibly rewritten)
/// value, so mutators are public.
#[derive(Debug, Clone, PartialEq)]
pub struct WireRequest {
    url: Url,
    method: Method,
    headers: HeaderMap,
    body: Option<Bytes>,
    cache_hint: CacheHint,
    timeout: Duration,
}

impl WireRequest {
    /// Builds the wire request described by `endpoint`.
    ///
    /// Headers accumulate: every configured value is appended, so multiple
    /// entries under one name all survive. The body-construction path is
    /// selected by the endpoint's [`Task`] variant; exactly one path runs.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::EncodingFailed`] when the URL cannot be
    /// resolved or the task's parameters cannot be encoded. The failure is
    /// returned before any network or mock attempt.
    pub fn from_endpoint<E: Endpoint + ?Sized>(endpoint: &E) -> Result<Self, NetworkError> {
        let url = resolve_url(&endpoint.base_url(), &endpoint.path())?;

        let mut headers = HeaderMap::new();
        for (name, value) in &endpoint.headers() {
            headers.append(name, value.clone());
        }

        let request = Self {
            url,
            method: endpoint.method(),
            headers,
            body: None,
            cache_hint: endpoint.cache_hint(),
            timeout: endpoint.timeout(),
        };

        match endpoint.task() {
            Task::Plain => Ok(request),
            Task::RawBytes { data } => {
                let mut request = request;
                request.body = Some(data);
                Ok(request)
            }
            Task::Json { value } => {
                let serde_json::Value::Object(object) = value else {
                    return Err(NetworkError::EncodingFailed {
                        reason: EncodingFailureReason::EncodableConversion,
                    });
                };
                JsonParameterEncoder.encode(request, &object)
            }
            Task::Form {
                parameters,
                destination,
            } => UrlParameterEncoder::new(destination).encode(request, &parameters),
        }
    }

    /// The resolved absolute URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Mutable access to the URL, for encoders and interceptors.
    pub fn url_mut(&mut self) -> &mut Url {
        &mut self.url
    }

    /// The HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The header multimap.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable access to the headers, for encoders and interceptors.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// The body bytes, if any.
    #[must_use]
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Replaces the body.
    pub fn set_body(&mut self, body: Option<Bytes>) {
        self.body = body;
    }

    /// The advisory cache hint.
    #[must_use]
    pub fn cache_hint(&self) -> CacheHint {
        self.cache_hint
    }

    /// The per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Joins `path` onto `base` a segment at a time.
fn resolve_url(base: &Url, path: &str) -> Result<Url, NetworkError> {
    let mut url = base.clone();
    {
        let Ok(mut segments) = url.path_segments_mut() else {
            return Err(NetworkError::EncodingFailed {
                reason: EncodingFailureReason::MissingUrl,
            });
        };
        segments.pop_if_empty();
        segments.extend(path.split('/').filter(|segment| !segment.is_empty()));
    }
    Ok(url)
}
