//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use clima_domain::error::ClimateError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`ClimateError`] to an HTTP response with appropriate status code.
pub struct ApiError(ClimateError);

impl From<ClimateError> for ApiError {
    fn from(err: ClimateError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ClimateError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ClimateError::Computation(err) => {
                tracing::error!(error = %err, "computation error");
                (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
            }
            ClimateError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            ClimateError::Transport(err) => {
                tracing::error!(error = %err, "transport error");
                (StatusCode::BAD_GATEWAY, "transport unavailable".to_string())
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
