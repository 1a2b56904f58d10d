//! The JSON body encoder.

use bytes::Bytes;
use http::{HeaderValue, header::CONTENT_TYPE};
use snafu::ResultExt as _;

use super::ParameterEncoder;
use crate::{
    error::{JsonSerializationSnafu, NetworkError},
    request::WireRequest,
};

/// Serializes a JSON object tree as the request body.
///
/// Deliberately distinct from the form-body path: the same parameters
/// encoded through [`UrlParameterEncoder`](super::UrlParameterEncoder)
/// produce `key=value` text, not JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParameterEncoder;

impl ParameterEncoder for JsonParameterEncoder {
    type Parameters = serde_json::Map<String, serde_json::Value>;

    fn encode(
        &self,
        mut request: WireRequest,
        parameters: &Self::Parameters,
    ) -> Result<WireRequest, NetworkError> {
        let body = serde_json::to_vec(parameters)
            .context(JsonSerializationSnafu)
            .map_err(|reason| NetworkError::EncodingFailed { reason })?;
        request.set_body(Some(Bytes::from(body)));

        if !request.headers().contains_key(CONTENT_TYPE) {
            request
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        Ok(request)
    }
}
