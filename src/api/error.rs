//! HTTP error responses
//!
//! Every failure answers with `{ "error": message }`. Unexpected failures are
//! logged in full and answered with the operation's generic message.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::error::BizdeskError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// A 500 carrying `context` as its message
    pub fn internal(context: &'static str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, context)
    }

    /// Map a crate error; `context` is the message used for unexpected failures
    pub fn from_error(err: BizdeskError, context: &'static str) -> Self {
        match err {
            BizdeskError::Validation(message) => Self::bad_request(message),
            BizdeskError::NotFound { entity_type, .. } => {
                Self::not_found(format!("{} not found", entity_type))
            }
            err @ (BizdeskError::Duplicate { .. } | BizdeskError::Conflict { .. }) => {
                Self::new(StatusCode::CONFLICT, err.to_string())
            }
            err => {
                error!(error = %err, "{}", context);
                Self::internal(context)
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Unwrap a JSON body, answering 400 when it could not be parsed
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(ApiError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err = ApiError::from_error(BizdeskError::Validation("Name is required".into()), "ctx");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Name is required");

        let err = ApiError::from_error(
            BizdeskError::NotFound {
                entity_type: "Product",
                identifier: "x".into(),
            },
            "ctx",
        );
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Product not found");

        let err = ApiError::from_error(
            BizdeskError::Duplicate {
                entity_type: "Brand",
                identifier: "Samsung".into(),
            },
            "ctx",
        );
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_unexpected_errors_are_generic() {
        let err = ApiError::from_error(
            BizdeskError::Storage("disk on fire".into()),
            "Error fetching products",
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Error fetching products");
    }
}
