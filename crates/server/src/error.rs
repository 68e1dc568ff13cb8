//! Application error handling

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fhir_intake_core::{IssueType, OperationOutcome, ValidationError};
use serde_json::json;

use crate::upstream::UpstreamError;

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Client payload rejected, answered with a plain `{error}` body
    Validation(ValidationError),
    /// Bad request answered with an OperationOutcome
    BadRequest(String),
    Upstream(UpstreamError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response(),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(OperationOutcome::invalid(&msg))).into_response()
            }
            AppError::Upstream(err) => {
                let code = match err {
                    UpstreamError::Unreachable(_) => IssueType::Exception,
                    UpstreamError::NotOk(_) | UpstreamError::MalformedBody(_) => {
                        IssueType::Processing
                    }
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(OperationOutcome::error(code, &err.to_string())),
                )
                    .into_response()
            }
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        AppError::Upstream(err)
    }
}
