//! Service error to HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde::Serialize;

use crate::domain::ServiceError;

/// JSON error body returned on every failure path.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Newtype that converts orchestrator errors to HTTP responses.
///
/// Validation and gateway faults are the caller's problem (400), missing
/// resources are 404, and everything else is a generic 500 with the detail
/// kept server-side in the logs.
pub struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self.0 {
            ServiceError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                format!("{}: {}", field, message),
            ),
            ServiceError::NotFound(resource) => {
                (StatusCode::NOT_FOUND, format!("{} not found", resource))
            }
            ServiceError::Gateway { message, .. } => {
                (StatusCode::BAD_REQUEST, message.clone())
            }
            ServiceError::Unexpected(detail) => {
                tracing::error!(error = %detail, "Unexpected failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ServiceError) -> StatusCode {
        ApiError(err).into_response().status()
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let err = ServiceError::validation("amount", "must be greater than zero");
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(
            status_of(ServiceError::not_found("customer")),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn gateway_maps_to_bad_request() {
        assert_eq!(
            status_of(ServiceError::gateway("No such customer: 'cus_x'")),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn unexpected_maps_to_500() {
        assert_eq!(
            status_of(ServiceError::unexpected("boom")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
