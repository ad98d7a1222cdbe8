use crate::id::InvalidIdentifier;
use crate::schema::ValidationError;
use crate::store::StoreError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

/// ApiError
///
/// The closed failure taxonomy shared by every controller operation. Each
/// request path ends in either a success envelope or exactly one of these
/// four kinds; nothing is silently swallowed. The status mapping lives in one
/// place (`status_code`) instead of being repeated per handler.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed id in the path. Raised before any store call.
    InvalidIdentifier,
    /// Missing or malformed required field(s). Raised before any store call.
    Validation(ValidationError),
    /// Well-formed id with no matching record. Carries the resource label.
    NotFound(&'static str),
    /// Infrastructure-level store failure.
    Store(StoreError),
}

impl ApiError {
    /// The single mapping from error kind to HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidIdentifier | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::InvalidIdentifier => "invalid record id".to_string(),
            ApiError::Validation(err) => err.message().to_string(),
            ApiError::NotFound(resource) => format!("{resource} not found"),
            // The store detail stays in the logs; the caller gets a generic
            // message so store internals never leak through the envelope.
            ApiError::Store(_) => "internal server error".to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Store(err) => write!(f, "store failure: {err}"),
            other => f.write_str(&other.message()),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Store(err) => Some(err),
            ApiError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

/// The failure envelope: every error response is a JSON object with a
/// human-readable `message` field.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Store(err) = &self {
            tracing::error!(error = %err, "store operation failed");
        }

        let status = self.status_code();
        let body = ErrorBody { message: self.message() };
        (status, Json(body)).into_response()
    }
}

impl From<InvalidIdentifier> for ApiError {
    fn from(_: InvalidIdentifier) -> Self {
        ApiError::InvalidIdentifier
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}
