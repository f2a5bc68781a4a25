use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant is terminal for the action that raised it: session state is
/// left exactly as it was before the request.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("API key required. Set a credential for this session first.")]
    MissingCredential,

    #[error("Connection not tested. Run the connection test before generating.")]
    ConnectionUntested,

    #[error("{0}")]
    Provider(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        AppError::Provider(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::MissingCredential => (
                StatusCode::BAD_REQUEST,
                "MISSING_CREDENTIAL",
                self.to_string(),
            ),
            AppError::ConnectionUntested => (
                StatusCode::CONFLICT,
                "CONNECTION_UNTESTED",
                self.to_string(),
            ),
            AppError::Provider(msg) => {
                tracing::warn!("Provider error: {msg}");
                // Shown to the user verbatim.
                (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR", msg.clone())
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_message_is_passed_through_verbatim() {
        let err = AppError::Provider("Incorrect API key provided: sk-bad".to_string());
        assert_eq!(err.to_string(), "Incorrect API key provided: sk-bad");

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_llm_error_converts_to_provider() {
        let err: AppError = LlmError::Api {
            status: 429,
            message: "You exceeded your current quota".to_string(),
        }
        .into();

        match err {
            AppError::Provider(msg) => assert!(msg.contains("You exceeded your current quota")),
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[test]
    fn test_precondition_statuses() {
        assert_eq!(
            AppError::MissingCredential.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::ConnectionUntested.into_response().status(),
            StatusCode::CONFLICT
        );
    }
}
