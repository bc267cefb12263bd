use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::{ProcessError, ValidationError};

/// Error response body
#[derive(Serialize)]
struct ErrorBody {
    detail: String,
    code: &'static str,
}

/// An HTTP error: status, machine-readable code and client-facing detail
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, detail: impl Into<String>) -> Self {
        Self {
            status,
            code,
            detail: detail.into(),
        }
    }

    /// Unexpected server-side failure; details only go to the log
    pub fn internal(message: impl std::fmt::Display) -> Self {
        log::error!("Internal error: {}", message);
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "Internal server error",
        )
    }

    pub fn multipart(err: MultipartError) -> Self {
        Self::new(err.status(), "INVALID_MULTIPART", err.body_text())
    }

    /// Map a pipeline failure. Anything past validation is reported to the
    /// client only as `generic`.
    pub fn from_process(err: ProcessError, generic: &'static str) -> Self {
        match err {
            ProcessError::Validation(validation) => validation.into(),
            other => {
                log::error!("{}: {}", generic, other);
                let code = match other {
                    ProcessError::Compression { .. } => "COMPRESSION_FAILED",
                    _ => "CONVERSION_FAILED",
                };
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, code, generic)
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        let (status, code) = match &err {
            ValidationError::InvalidFileType { .. }
            | ValidationError::LegacyWordFormat(_)
            | ValidationError::NotPdf(_) => (StatusCode::BAD_REQUEST, "INVALID_FILE_TYPE"),
            ValidationError::NoFiles
            | ValidationError::MissingField(_)
            | ValidationError::InvalidField { .. }
            | ValidationError::EmptyFile(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR")
            }
        };
        log::info!("Rejected request: {}", err);
        Self::new(status, code, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: self.detail,
            code: self.code,
        };
        (self.status, Json(body)).into_response()
    }
}
