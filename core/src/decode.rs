//! Status checking and JSON decoding of API responses.

use serde::de::DeserializeOwned;

use crate::error::{ApiError, TransportError};
use crate::http::{HttpRequest, HttpResponse};

/// Map a non-2xx response to `ApiError::Transport`. The body is not looked at.
pub(crate) fn check_status(request: &HttpRequest, response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Transport {
        operation: request.operation,
        url: request.url.to_string(),
        source: TransportError::Status {
            status: response.status,
            reason: response.reason.clone(),
        },
    })
}

/// Check the status and decode the whole body as `T`.
pub(crate) fn decode<T: DeserializeOwned>(
    request: &HttpRequest,
    response: &HttpResponse,
) -> Result<T, ApiError> {
    check_status(request, response)?;
    serde_json::from_str(&response.body).map_err(|source| decode_error(request, response, source))
}

/// Check the status and decode the list stored under `key` in a
/// `{"<key>": [...]}` wrapper object.
pub(crate) fn decode_wrapped<T: DeserializeOwned>(
    request: &HttpRequest,
    response: &HttpResponse,
    key: &'static str,
) -> Result<Vec<T>, ApiError> {
    let mut wrapper: serde_json::Value = decode(request, response)?;
    let list = wrapper
        .as_object_mut()
        .and_then(|object| object.remove(key))
        .ok_or_else(|| ApiError::MalformedResponse {
            operation: request.operation,
            url: request.url.to_string(),
            key,
        })?;
    serde_json::from_value(list).map_err(|source| decode_error(request, response, source))
}

pub(crate) fn decode_error(
    request: &HttpRequest,
    response: &HttpResponse,
    source: serde_json::Error,
) -> ApiError {
    ApiError::Decode {
        operation: request.operation,
        url: request.url.to_string(),
        status: response.status,
        source,
    }
}
