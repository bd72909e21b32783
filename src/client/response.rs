//! Response normalization into the uniform result shape.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub(crate) const PARSE_FAILURE_MESSAGE: &str = "Failed to parse response";

/// The uniform result of every client call.
///
/// Never thrown, never wrapped in `Result`: ordinary HTTP failures, parse
/// failures, and transport failures all land here and callers branch on
/// `is_error`. A parse failure on a 2xx keeps `is_error == false`, so
/// callers that need the payload must also check `data` presence.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub is_error: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    /// Real HTTP status, or a synthetic one for transport-level failures
    /// (408 timeout, 499 cancelled, 500 otherwise).
    pub status: u16,
}

impl<T> ApiResponse<T> {
    /// Synthetic failure for transport-level errors.
    pub(crate) fn failure(status: u16, message: impl Into<String>) -> Self {
        Self {
            is_error: true,
            data: None,
            message: Some(message.into()),
            status,
        }
    }
}

/// Decode a raw body into the uniform shape.
///
/// Error/success is derived purely from the HTTP status; payload content
/// never flips it. Bodies shaped `{data, message}` are unwrapped, any other
/// JSON value is carried whole as `data`, and an undecodable body yields a
/// parse-failure message with the real status retained.
pub(crate) fn normalize(status: u16, body: &Bytes) -> ApiResponse<Value> {
    let is_error = !(200..300).contains(&status);

    if body.is_empty() {
        // No-content responses (204 and friends) are not parse failures.
        return ApiResponse {
            is_error,
            data: None,
            message: None,
            status,
        };
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(mut envelope)) if envelope.contains_key("data") => {
            let message = envelope
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned);
            let data = envelope.remove("data").filter(|v| !v.is_null());
            ApiResponse {
                is_error,
                data,
                message,
                status,
            }
        }
        Ok(Value::Null) => ApiResponse {
            is_error,
            data: None,
            message: None,
            status,
        },
        Ok(value) => ApiResponse {
            is_error,
            data: Some(value),
            message: None,
            status,
        },
        Err(_) => ApiResponse {
            is_error,
            data: None,
            message: Some(PARSE_FAILURE_MESSAGE.to_owned()),
            status,
        },
    }
}

/// Lift the decoded JSON into the caller's type. A failed lift degrades the
/// same way a malformed body does: no data, a parse-failure message, and the
/// status untouched.
pub(crate) fn typed<T: DeserializeOwned>(raw: ApiResponse<Value>) -> ApiResponse<T> {
    let ApiResponse {
        is_error,
        data,
        message,
        status,
    } = raw;

    match data {
        None => ApiResponse {
            is_error,
            data: None,
            message,
            status,
        },
        Some(value) => match serde_json::from_value::<T>(value) {
            Ok(data) => ApiResponse {
                is_error,
                data: Some(data),
                message,
                status,
            },
            Err(_) => ApiResponse {
                is_error,
                data: None,
                message: Some(PARSE_FAILURE_MESSAGE.to_owned()),
                status,
            },
        },
    }
}
