//! Maps core errors onto HTTP responses.
//!
//! Every error becomes the usual JSON envelope with `success: false`. Store
//! and configuration failures are logged here and answered with a generic
//! message; the underlying diagnostic is only sent in development mode.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::errors::Error;
use crate::http::response::ApiResponse;

/// Application-level error type for the HTTP facade.
#[derive(Debug)]
pub struct AppError {
    error: Error,
    expose_details: bool,
}

impl AppError {
    pub fn new(error: Error, expose_details: bool) -> Self {
        Self {
            error,
            expose_details,
        }
    }

    pub fn status(&self) -> StatusCode {
        match &self.error {
            Error::Validation { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::InsufficientCredits { .. } => StatusCode::PAYMENT_REQUIRED,
            Error::Database(_) | Error::Config { .. } | Error::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// For client input errors, which have no internal diagnostics to hide.
impl From<Error> for AppError {
    fn from(error: Error) -> Self {
        Self::new(error, false)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Error::validation(format!("Invalid JSON body: {}", rejection.body_text())).into()
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Error::validation(format!("Invalid query string: {}", rejection.body_text())).into()
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Error::validation(format!("Invalid path: {}", rejection.body_text())).into()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self.error {
            Error::Validation { message } => ApiResponse::failure(message.clone()),
            Error::NotFound { .. } => ApiResponse::failure(self.error.to_string()),
            Error::InsufficientCredits { current, required } => ApiResponse {
                data: Some(json!({
                    "currentCredits": current,
                    "requiredCredits": required,
                    "canGenerate": false,
                })),
                ..ApiResponse::failure("Insufficient credits")
            },
            Error::Database(_) | Error::Config { .. } | Error::Io(_) => {
                tracing::error!(error = %self.error, "Request error");
                let mut body = ApiResponse::failure("Internal server error");
                if self.expose_details {
                    body.details = Some(self.error.to_string());
                }
                body
            }
        };

        (status, Json(body)).into_response()
    }
}
