//! Plain-text export of a single assessment.

use anyhow::Context;
use axum::{
    body::Body,
    http::{header, StatusCode},
    response::Response,
};
use bytes::Bytes;

use crate::errors::AppError;
use crate::models::assessment::AssessmentRecord;

pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";

/// `MYP{level}_{topic}_Assessment.txt`
pub fn download_filename(record: &AssessmentRecord) -> String {
    format!(
        "MYP{}_{}_Assessment.txt",
        record.metadata.level, record.metadata.topic
    )
}

/// Attachment response whose body is exactly the record's content bytes.
pub fn text_download(record: &AssessmentRecord) -> Result<Response, AppError> {
    let filename = download_filename(record);
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, TEXT_PLAIN_UTF8)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )
        .body(Body::from(Bytes::from(record.content.clone())))
        .with_context(|| format!("Failed to build download response for {filename}"))?;
    Ok(response)
}
