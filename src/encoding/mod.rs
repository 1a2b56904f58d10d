//! Parameter encoding for request bodies and query strings.
//!
//! [`UrlEncoding`] implements the deterministic `key=value` grammar used for
//! form parameters; [`UrlParameterEncoder`] and [`JsonParameterEncoder`]
//! apply an encoding to a [`WireRequest`](crate::request::WireRequest)
//! through the common [`ParameterEncoder`] seam.

mod json;
mod parameters;
mod url;

use crate::{error::NetworkError, request::WireRequest};

pub use self::json::JsonParameterEncoder;
pub use self::parameters::{ParamValue, Parameters};
pub use self::url::{ArrayEncoding, BoolEncoding, Destination, UrlEncoding, UrlParameterEncoder};

/// Applies a set of parameters to a request, producing a new request.
///
/// Implementations are pure transforms: they consume the request and return
/// an updated value rather than mutating in place.
pub trait ParameterEncoder {
    /// The parameter representation this encoder consumes.
    type Parameters;

    /// Encodes `parameters` into `request`.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::EncodingFailed`] if the parameters cannot be
    /// rendered into the request.
    fn encode(
        &self,
        request: WireRequest,
        parameters: &Self::Parameters,
    ) -> Result<WireRequest, NetworkError>;
}
