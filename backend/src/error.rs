use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use recipe_ai_harness::ProviderError;
use recipe_core::{ValidationError, event::UPSTREAM_FAILURE_MESSAGE};
use serde_json::json;
use thiserror::Error;

/// Failures that end a request before any stream is returned.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("upstream request failed: {0}")]
    Upstream(#[from] ProviderError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::Upstream(err) => {
                tracing::error!(
                    provider = %err.provider_id(),
                    status_code = ?err.status_code(),
                    error = %err,
                    "recipe generation failed before streaming"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    UPSTREAM_FAILURE_MESSAGE.to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
