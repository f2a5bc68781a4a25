//! Request extractors whose rejections render through `AppError`.
//!
//! Axum's stock `Json` and `Path` reject with plain-text bodies; these wrap
//! them so malformed input gets the same `{"error":{...}}` envelope as every
//! other failure.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts};

use crate::errors::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        // Server-side rejections mean a route/handler mismatch, not bad input.
        if rejection.status().is_server_error() {
            return AppError::Internal(anyhow::anyhow!(
                "path extraction failed: {}",
                rejection.body_text()
            ));
        }
        AppError::Validation(rejection.body_text())
    }
}
