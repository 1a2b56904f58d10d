//! Request dispatching: build, intercept, send or mock, intercept, complete.

use std::sync::{Mutex, MutexGuard, PoisonError};

use bon::Builder;
use http::HeaderMap;
use tokio::sync::oneshot;

use crate::{
    endpoint::{Endpoint, MockFixture},
    error::{Cancelled, NetworkError},
    interceptor::InterceptorChain,
    platform::Duration,
    request::WireRequest,
    response::Response,
    transport::{NoTransport, Transport, TransportError},
};

/// Policy controlling whether and when a fabricated response replaces a
/// real network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MockBehavior {
    /// Always hit the real transport.
    #[default]
    Never,
    /// Synthesize the endpoint's fixture on the next tick of the
    /// cooperative scheduler, with no real I/O.
    Immediate,
    /// Synthesize the endpoint's fixture after a timer delay.
    Delayed {
        /// The delay before the fixture resolves.
        seconds: u64,
    },
}

/// Executes endpoints through one uniform completion contract.
///
/// An execution moves build, prepare, send-or-mock, process, complete.
/// Whichever resolves first (the exchange or a [`cancel`](Dispatcher::cancel))
/// reaches the completion callback, exactly once per
/// [`execute`](Dispatcher::execute) call.
///
/// One outstanding operation per instance is assumed: a second `execute`
/// while one is in flight overwrites the tracked cancellation handle and
/// orphans the prior operation (it runs to completion but can no longer be
/// cancelled). This is a documented limitation, not internally guarded.
#[derive(Builder)]
pub struct Dispatcher<T: Transport = NoTransport> {
    /// The transport used when mocking is off.
    transport: T,
    /// Transforms applied around every dispatch, in order.
    #[builder(default, into)]
    interceptors: InterceptorChain,
    /// Whether executions are mocked.
    #[builder(default)]
    mock_behavior: MockBehavior,
    #[builder(skip)]
    pending: Mutex<Option<oneshot::Sender<()>>>,
}

impl<T: Transport> Dispatcher<T> {
    /// Executes `endpoint` and hands the outcome to `completion`.
    ///
    /// Build failures skip the network entirely but still flow through the
    /// interceptors' `process` for uniform observability. Transport
    /// failures and cancellation both surface as
    /// [`NetworkError::Underlying`], distinguished by the wrapped cause.
    ///
    /// # Panics
    ///
    /// Panics when mocking is selected but `endpoint` carries no mock
    /// fixture. That combination is a programming-contract violation in
    /// the caller's configuration, not a recoverable request failure.
    pub async fn execute<E, F>(&self, endpoint: &E, completion: F)
    where
        E: Endpoint,
        F: FnOnce(Result<Response, NetworkError>),
    {
        let request = match WireRequest::from_endpoint(endpoint) {
            Ok(request) => request,
            Err(error) => {
                completion(self.interceptors.process(Err(error)));
                return;
            }
        };
        let request = self.interceptors.prepare(request);
        let fixture = endpoint.mock_fixture();

        let (cancel, cancelled) = oneshot::channel();
        *self.lock_pending() = Some(cancel);

        let result = tokio::select! {
            // A dropped sender means this operation was orphaned by a newer
            // `execute`; only an explicit `cancel` resolves this branch.
            Ok(()) = cancelled => Err(NetworkError::Underlying {
                source: Box::new(Cancelled),
                response: None,
            }),
            result = self.resolve(request, fixture) => result,
        };

        completion(self.interceptors.process(result));
    }

    /// Cancels the outstanding operation, if any.
    ///
    /// Cancelling before the exchange resolves yields exactly one
    /// completion carrying [`Cancelled`] and suppresses the original
    /// firing. Cancelling after completion is a no-op.
    pub fn cancel(&self) {
        if let Some(cancel) = self.lock_pending().take() {
            let _ = cancel.send(());
        }
    }

    async fn resolve(
        &self,
        request: WireRequest,
        fixture: Option<MockFixture>,
    ) -> Result<Response, NetworkError> {
        match self.mock_behavior {
            MockBehavior::Never => match self.transport.send(request).await {
                Ok(response) => Ok(response),
                Err(TransportError { source, response }) => Err(NetworkError::Underlying {
                    source: Box::new(source),
                    response: response.map(Box::new),
                }),
            },
            MockBehavior::Immediate => {
                tokio::task::yield_now().await;
                Self::fabricate(request, fixture)
            }
            MockBehavior::Delayed { seconds } => {
                crate::platform::sleep(Duration::from_secs(seconds)).await;
                Self::fabricate(request, fixture)
            }
        }
    }

    // The missing-fixture panic is the documented contract violation; the
    // crate otherwise denies `clippy::panic`.
    #[allow(clippy::panic)]
    fn fabricate(
        request: WireRequest,
        fixture: Option<MockFixture>,
    ) -> Result<Response, NetworkError> {
        let Some(fixture) = fixture else {
            panic!("mock dispatch requested for an endpoint without a mock fixture");
        };

        match fixture {
            MockFixture::FixedResponse { status, body } => Ok(Response::new(
                request,
                Some(body),
                Some(status),
                Some(HeaderMap::new()),
            )),
            MockFixture::SimulatedError { error } => Err(NetworkError::Underlying {
                source: error,
                response: None,
            }),
        }
    }

    fn lock_pending(&self) -> MutexGuard<'_, Option<oneshot::Sender<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use bytes::Bytes;
    use http::{HeaderValue, Method, StatusCode};
    use serde::Deserialize;
    use url::Url;

    use super::*;
    use crate::{
        endpoint::Task,
        interceptor::Interceptor,
        transport::TransportUnavailable,
    };

    #[derive(Debug, Deserialize)]
    struct TestMessage {
        message: String,
    }

    #[derive(Clone, Copy)]
    enum TestEndpoint {
        Immediate,
        WrongJsonFormat,
        SimulatedFailure,
        WithoutFixture,
        NonObjectJson,
    }

    impl Endpoint for TestEndpoint {
        fn base_url(&self) -> Url {
            Url::parse("https://example.com").expect("static url")
        }

        fn path(&self) -> String {
            "test".to_owned()
        }

        fn method(&self) -> Method {
            Method::GET
        }

        fn task(&self) -> Task {
            match self {
                Self::NonObjectJson => Task::Json {
                    value: serde_json::Value::String("bare".to_owned()),
                },
                _ => Task::Plain,
            }
        }

        fn headers(&self) -> HeaderMap {
            HeaderMap::new()
        }

        fn mock_fixture(&self) -> Option<MockFixture> {
            match self {
                Self::Immediate => Some(MockFixture::FixedResponse {
                    status: StatusCode::CREATED,
                    body: Bytes::from_static(b"{ \"message\": \"Completed mocked request\" }\n"),
                }),
                Self::WrongJsonFormat => Some(MockFixture::FixedResponse {
                    status: StatusCode::CREATED,
                    body: Bytes::from_static(b"{ \"message\" \"Completed mocked request\" }\n"),
                }),
                Self::SimulatedFailure => Some(MockFixture::SimulatedError {
                    error: Box::new(std::io::Error::new(
                        std::io::ErrorKind::ConnectionRefused,
                        "simulated outage",
                    )),
                }),
                Self::WithoutFixture | Self::NonObjectJson => None,
            }
        }
    }

    fn mocked(mock_behavior: MockBehavior) -> Dispatcher {
        Dispatcher::builder()
            .transport(NoTransport)
            .mock_behavior(mock_behavior)
            .build()
    }

    #[tokio::test]
    async fn immediate_mock_completes_with_the_fixture() {
        let dispatcher = mocked(MockBehavior::Immediate);
        let completions = AtomicUsize::new(0);

        dispatcher
            .execute(&TestEndpoint::Immediate, |result| {
                completions.fetch_add(1, Ordering::SeqCst);
                let response = result.expect("mocked success");
                assert_eq!(response.status(), Some(StatusCode::CREATED));
                let decoded: TestMessage = response.decode().expect("fixture body decodes");
                assert_eq!(decoded.message, "Completed mocked request");
            })
            .await;

        assert_eq!(completions.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_mock_waits_the_configured_delay() {
        let dispatcher = mocked(MockBehavior::Delayed { seconds: 3 });
        let started = tokio::time::Instant::now();

        dispatcher
            .execute(&TestEndpoint::Immediate, |result| {
                let response = result.expect("mocked success");
                assert_eq!(response.status(), Some(StatusCode::CREATED));
            })
            .await;

        assert!(started.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelling_before_the_delay_completes_once_with_a_cancellation() {
        let dispatcher = Arc::new(mocked(MockBehavior::Delayed { seconds: 3 }));
        let completions = Arc::new(AtomicUsize::new(0));

        let canceller = Arc::clone(&dispatcher);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            canceller.cancel();
        });

        let seen = Arc::clone(&completions);
        dispatcher
            .execute(&TestEndpoint::Immediate, move |result| {
                seen.fetch_add(1, Ordering::SeqCst);
                let error = result.expect_err("cancellation must fail the dispatch");
                assert!(error.is_cancellation());
            })
            .await;

        assert_eq!(completions.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cancelling_after_completion_is_a_no_op() {
        let dispatcher = mocked(MockBehavior::Immediate);
        let completions = AtomicUsize::new(0);

        dispatcher
            .execute(&TestEndpoint::Immediate, |result| {
                completions.fetch_add(1, Ordering::SeqCst);
                assert!(result.is_ok());
            })
            .await;

        dispatcher.cancel();
        assert_eq!(completions.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn a_simulated_error_fixture_surfaces_as_underlying() {
        let dispatcher = mocked(MockBehavior::Immediate);

        dispatcher
            .execute(&TestEndpoint::SimulatedFailure, |result| {
                let error = result.expect_err("fixture simulates a failure");
                let NetworkError::Underlying { source, response } = error else {
                    unreachable!("expected an underlying error");
                };
                assert!(response.is_none());
                assert!(source.downcast_ref::<std::io::Error>().is_some());
            })
            .await;
    }

    #[tokio::test]
    async fn malformed_fixture_bodies_decode_to_none() {
        let dispatcher = mocked(MockBehavior::Immediate);

        dispatcher
            .execute(&TestEndpoint::WrongJsonFormat, |result| {
                let response = result.expect("mocked success");
                assert!(response.decode::<TestMessage>().is_none());
            })
            .await;
    }

    #[tokio::test]
    #[should_panic(expected = "without a mock fixture")]
    async fn mocking_without_a_fixture_is_fatal() {
        let dispatcher = mocked(MockBehavior::Immediate);
        dispatcher
            .execute(&TestEndpoint::WithoutFixture, |_result| {})
            .await;
    }

    #[tokio::test]
    async fn build_failures_complete_without_touching_the_network() {
        let dispatcher = mocked(MockBehavior::Never);
        let completions = AtomicUsize::new(0);

        dispatcher
            .execute(&TestEndpoint::NonObjectJson, |result| {
                completions.fetch_add(1, Ordering::SeqCst);
                assert!(matches!(result, Err(NetworkError::EncodingFailed { .. })));
            })
            .await;

        assert_eq!(completions.load(Ordering::SeqCst), 1);
    }

    struct AuthInterceptor;

    impl Interceptor for AuthInterceptor {
        fn prepare(&self, mut request: WireRequest) -> WireRequest {
            request
                .headers_mut()
                .append("authorization", HeaderValue::from_static("Bearer token1"));
            request
        }

        fn process(
            &self,
            result: Result<Response, NetworkError>,
        ) -> Result<Response, NetworkError> {
            let response = result?;
            let mut headers = response.headers().cloned().unwrap_or_default();
            headers.insert("authorization", HeaderValue::from_static("Bearer token2"));
            Ok(Response::new(
                response.request().clone(),
                response.body().cloned(),
                Some(StatusCode::OK),
                Some(headers),
            ))
        }
    }

    struct PingPongInterceptor;

    impl Interceptor for PingPongInterceptor {
        fn prepare(&self, mut request: WireRequest) -> WireRequest {
            request
                .headers_mut()
                .append("ping", HeaderValue::from_static("1"));
            request
        }

        fn process(
            &self,
            result: Result<Response, NetworkError>,
        ) -> Result<Response, NetworkError> {
            let response = result?;
            let mut headers = response.headers().cloned().unwrap_or_default();
            headers.insert("pong", HeaderValue::from_static("2"));
            Ok(Response::new(
                response.request().clone(),
                response.body().cloned(),
                response.status(),
                Some(headers),
            ))
        }
    }

    #[tokio::test]
    async fn a_single_interceptor_rewrites_both_directions() {
        let dispatcher = Dispatcher::builder()
            .transport(NoTransport)
            .interceptors(vec![Arc::new(AuthInterceptor) as Arc<dyn Interceptor>])
            .mock_behavior(MockBehavior::Immediate)
            .build();

        dispatcher
            .execute(&TestEndpoint::Immediate, |result| {
                let response = result.expect("mocked success");
                assert_eq!(
                    response.request().headers().get("authorization"),
                    Some(&HeaderValue::from_static("Bearer token1"))
                );
                assert_eq!(
                    response
                        .headers()
                        .and_then(|headers| headers.get("authorization")),
                    Some(&HeaderValue::from_static("Bearer token2"))
                );
                assert_eq!(response.status(), Some(StatusCode::OK));
            })
            .await;
    }

    #[tokio::test]
    async fn without_interceptors_the_fixture_passes_through_untouched() {
        let dispatcher = mocked(MockBehavior::Immediate);

        dispatcher
            .execute(&TestEndpoint::Immediate, |result| {
                let response = result.expect("mocked success");
                assert!(response.request().headers().get("authorization").is_none());
                assert_eq!(response.status(), Some(StatusCode::CREATED));
            })
            .await;
    }

    #[tokio::test]
    async fn multiple_interceptors_compose_in_list_order() {
        let dispatcher = Dispatcher::builder()
            .transport(NoTransport)
            .interceptors(vec![
                Arc::new(AuthInterceptor) as Arc<dyn Interceptor>,
                Arc::new(PingPongInterceptor) as Arc<dyn Interceptor>,
            ])
            .mock_behavior(MockBehavior::Immediate)
            .build();

        dispatcher
            .execute(&TestEndpoint::Immediate, |result| {
                let response = result.expect("mocked success");
                assert_eq!(
                    response.request().headers().get("authorization"),
                    Some(&HeaderValue::from_static("Bearer token1"))
                );
                assert_eq!(
                    response.request().headers().get("ping"),
                    Some(&HeaderValue::from_static("1"))
                );
                let headers = response.headers().expect("rewritten headers");
                assert_eq!(
                    headers.get("authorization"),
                    Some(&HeaderValue::from_static("Bearer token2"))
                );
                assert_eq!(headers.get("pong"), Some(&HeaderValue::from_static("2")));
                assert_eq!(response.status(), Some(StatusCode::OK));
            })
            .await;
    }

    #[tokio::test]
    async fn build_failures_still_flow_through_process() {
        struct CountingInterceptor {
            processed: Arc<AtomicUsize>,
        }

        impl Interceptor for CountingInterceptor {
            fn process(
                &self,
                result: Result<Response, NetworkError>,
            ) -> Result<Response, NetworkError> {
                self.processed.fetch_add(1, Ordering::SeqCst);
                result
            }
        }

        let processed = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::builder()
            .transport(NoTransport)
            .interceptors(vec![Arc::new(CountingInterceptor {
                processed: Arc::clone(&processed),
            }) as Arc<dyn Interceptor>])
            .mock_behavior(MockBehavior::Never)
            .build();

        dispatcher
            .execute(&TestEndpoint::NonObjectJson, |result| {
                assert!(result.is_err());
            })
            .await;

        assert_eq!(processed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn the_placeholder_transport_fails_real_sends() {
        let dispatcher = mocked(MockBehavior::Never);

        dispatcher
            .execute(&TestEndpoint::Immediate, |result| {
                let error = result.expect_err("no transport configured");
                let NetworkError::Underlying { source, .. } = error else {
                    unreachable!("expected an underlying error");
                };
                assert!(source.downcast_ref::<TransportUnavailable>().is_some());
            })
            .await;
    }

    struct ScriptedTransport {
        status: StatusCode,
        body: &'static [u8],
    }

    impl Transport for ScriptedTransport {
        type Error = TransportUnavailable;

        async fn send(
            &self,
            request: WireRequest,
        ) -> Result<Response, TransportError<Self::Error>> {
            Ok(Response::new(
                request,
                Some(Bytes::from_static(self.body)),
                Some(self.status),
                Some(HeaderMap::new()),
            ))
        }
    }

    #[tokio::test]
    async fn the_real_path_wraps_the_transport_exchange() {
        let dispatcher = Dispatcher::builder()
            .transport(ScriptedTransport {
                status: StatusCode::OK,
                body: b"{ \"message\": \"from the wire\" }",
            })
            .build();

        dispatcher
            .execute(&TestEndpoint::Immediate, |result| {
                let response = result.expect("scripted transport succeeds");
                assert_eq!(response.status(), Some(StatusCode::OK));
                let decoded: TestMessage = response.decode().expect("body decodes");
                assert_eq!(decoded.message, "from the wire");
            })
            .await;
    }
}
