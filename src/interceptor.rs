//! Request/response transforms applied around every dispatch.

use std::sync::Arc;

use crate::{error::NetworkError, platform::MaybeSendSync, request::WireRequest, response::Response};

/// A transform applied to every outgoing request and every completion.
///
/// Both hooks are pure: they consume a value and return the replacement.
/// The defaults pass values through untouched, so an implementation can
/// override only the side it cares about. Implementations must not retain
/// the values they are handed across calls.
pub trait Interceptor: MaybeSendSync {
    /// Rewrites the request before it is sent or mocked.
    fn prepare(&self, request: WireRequest) -> WireRequest {
        request
    }

    /// Rewrites the completion result, success or failure alike.
    fn process(
        &self,
        result: Result<Response, NetworkError>,
    ) -> Result<Response, NetworkError> {
        result
    }
}

/// An ordered list of interceptors applied as a sequential fold.
///
/// `prepare` runs in list order strictly before any send or mock attempt;
/// `process` runs in the same order after the exchange resolves, regardless
/// of success or failure. Each interceptor receives the previous one's
/// output.
#[derive(Clone, Default)]
pub struct InterceptorChain {
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl InterceptorChain {
    /// Builds a chain from an ordered list.
    #[must_use]
    pub fn new(interceptors: Vec<Arc<dyn Interceptor>>) -> Self {
        Self { interceptors }
    }

    /// Folds the request through every interceptor's `prepare`.
    #[must_use]
    pub fn prepare(&self, request: WireRequest) -> WireRequest {
        self.interceptors
            .iter()
            .fold(request, |request, interceptor| interceptor.prepare(request))
    }

    /// Folds the result through every interceptor's `process`.
    pub fn process(
        &self,
        result: Result<Response, NetworkError>,
    ) -> Result<Response, NetworkError> {
        self.interceptors
            .iter()
            .fold(result, |result, interceptor| interceptor.process(result))
    }
}

impl std::fmt::Debug for InterceptorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptorChain")
            .field("len", &self.interceptors.len())
            .finish()
    }
}

impl From<Vec<Arc<dyn Interceptor>>> for InterceptorChain {
    fn from(interceptors: Vec<Arc<dyn Interceptor>>) -> Self {
        Self::new(interceptors)
    }
}
