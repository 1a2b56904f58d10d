//! Implements an HTTP client core with declarative endpoints, interceptor
//! chains, mockable dispatch, and TLS certificate pinning.

#![forbid(unsafe_code)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod dispatch;
pub mod encoding;
pub mod endpoint;
pub mod error;
pub mod interceptor;
pub mod pinning;
pub mod platform;
pub mod request;
pub mod response;
pub mod session;
pub mod transport;

pub use dispatch::{Dispatcher, MockBehavior};
pub use endpoint::{Endpoint, MockFixture, Task};
pub use error::{BoxedCause, Cancelled, EncodingFailureReason, NetworkError};
pub use interceptor::{Interceptor, InterceptorChain};
pub use request::{CacheHint, WireRequest};
pub use response::Response;
pub use session::{ChallengeDisposition, SessionConfiguration};

/// Documentation
pub mod _documentation {
    #[doc = include_str!("../README.md")]
    mod readme {}
}
