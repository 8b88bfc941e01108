use crate::error::BrowserError;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Multipart(MultipartError),
    /// `action` names what failed, e.g. "Failed to list files"
    Operation {
        action: &'static str,
        source: BrowserError,
    },
}

impl ApiError {
    pub fn operation(action: &'static str) -> impl FnOnce(BrowserError) -> Self {
        move |source| ApiError::Operation { action, source }
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        ApiError::Multipart(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg)
            | ApiError::Operation {
                source: BrowserError::InvalidArgument(msg),
                ..
            } => (StatusCode::BAD_REQUEST, serde_json::json!({ "error": msg })),
            ApiError::Multipart(e) => (e.status(), serde_json::json!({ "error": e.body_text() })),
            ApiError::Operation { action, source } => {
                error!("{}: {}", action, source);
                let status = match source {
                    BrowserError::TimedOut(_) => StatusCode::GATEWAY_TIMEOUT,
                    BrowserError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (
                    status,
                    serde_json::json!({ "error": action, "message": source.to_string() }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::StoreError;
    use std::time::Duration;

    #[test]
    fn invalid_argument_maps_to_bad_request() {
        let err = ApiError::operation("Failed to delete file")(BrowserError::invalid_argument(
            "objectName parameter is required",
        ));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn store_failure_maps_to_server_error() {
        let err = ApiError::operation("Failed to list files")(BrowserError::StoreUnavailable(
            StoreError::backend("ListObjectsV2", "connection reset"),
        ));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn timeout_maps_to_gateway_timeout() {
        let err = ApiError::operation("Failed to delete folder")(BrowserError::TimedOut(
            Duration::from_secs(120),
        ));
        assert_eq!(err.into_response().status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn cancellation_maps_to_service_unavailable() {
        let err = ApiError::operation("Failed to delete folder")(BrowserError::Cancelled);
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
