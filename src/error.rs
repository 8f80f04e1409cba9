//! Error types for gemini-relay.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::gemini::UpstreamError;

/// Result type alias for relay operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Request-level error returned by the relay handlers.
///
/// Every variant is terminal for the request. The display string is what the
/// caller sees in the `error` field of the response body.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The caller sent no usable prompt.
    #[error("prompt required")]
    InvalidInput,

    /// Bootstrap never obtained a model handle.
    #[error("not configured")]
    Unavailable,

    /// The upstream call failed; the message is passed through verbatim.
    #[error("{0}")]
    Upstream(String),

    /// The upstream call succeeded but produced no text.
    #[error("empty response")]
    EmptyResponse,
}

impl Error {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidInput => StatusCode::BAD_REQUEST,
            Error::Unavailable | Error::Upstream(_) | Error::EmptyResponse => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<UpstreamError> for Error {
    fn from(err: UpstreamError) -> Self {
        Error::Upstream(err.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1_048_576)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn test_invalid_input_is_400() {
        let response = Error::InvalidInput.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json, serde_json::json!({ "error": "prompt required" }));
    }

    #[tokio::test]
    async fn test_unavailable_is_500() {
        let response = Error::Unavailable.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "not configured");
    }

    #[tokio::test]
    async fn test_upstream_message_passes_through() {
        let response = Error::Upstream("429 Resource has been exhausted".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "429 Resource has been exhausted");
    }

    #[tokio::test]
    async fn test_empty_response_is_500() {
        let response = Error::EmptyResponse.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "empty response");
    }

    #[test]
    fn test_from_upstream_error_keeps_message() {
        let err: Error = UpstreamError::Blocked("SAFETY".into()).into();
        assert_eq!(err.to_string(), "prompt blocked: SAFETY");
    }
}
