pub mod codes;
pub mod handlers;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use utoipa::ToSchema;

/// Error envelope returned for every failed request.
///
/// `error` is a plain message for most failures and a
/// `{field: [reasons]}` object for validation failures.
///
/// ```json
/// { "error": "User not found" }
/// { "error": { "email": ["does not match the email pattern"] } }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(value_type = Object)]
    pub error: Value,
}

impl ErrorResponse {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            error: Value::String(message.into()),
        }
    }
}

/// Application error type that can be converted to HTTP responses.
///
/// Client errors are logged at `info`/`warn`; server faults at `error`, with
/// their detail kept out of the response body.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    /// Field-level failures, rendered as the `error` payload verbatim
    #[error("Validation error: {0}")]
    Validation(Value),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    /// Body that parsed but cannot be stored; the detail is logged only
    #[error("Unstorable value: {0}")]
    UnstorableValue(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    /// Store fault; the detail is logged, the client sees a fixed message
    #[error("Database error: {0}")]
    Database(String),

    #[error("Credential error: {0}")]
    Credential(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::JsonExtraction.code(),
                    "JSON extraction error: {:?}",
                    e
                );
                (e.status(), Value::String(e.body_text()))
            }
            AppError::Validation(fields) => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    "Validation error: {}",
                    fields
                );
                (StatusCode::BAD_REQUEST, fields)
            }
            AppError::BadRequest(msg) => {
                tracing::info!(error_code = ErrorCode::BadRequest.code(), "Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, Value::String(msg))
            }
            AppError::UnstorableValue(detail) => {
                tracing::info!(
                    error_code = ErrorCode::UnstorableValue.code(),
                    "Unstorable value: {}",
                    detail
                );
                (
                    StatusCode::BAD_REQUEST,
                    Value::String(ErrorCode::UnstorableValue.default_message().to_string()),
                )
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {}", msg);
                (StatusCode::NOT_FOUND, Value::String(msg))
            }
            AppError::Database(detail) => {
                tracing::error!(
                    error_code = ErrorCode::DatabaseError.code(),
                    "Database error: {}",
                    detail
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Value::String(ErrorCode::DatabaseError.default_message().to_string()),
                )
            }
            AppError::Credential(detail) => {
                tracing::error!(
                    error_code = ErrorCode::CredentialHash.code(),
                    "Credential error: {}",
                    detail
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Value::String(ErrorCode::CredentialHash.default_message().to_string()),
                )
            }
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::json;

    async fn render(error: AppError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_renders_message_envelope() {
        let (status, body) = render(AppError::NotFound("User not found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "User not found" }));
    }

    #[tokio::test]
    async fn test_validation_renders_field_map() {
        let fields = json!({ "name": ["required field"] });
        let (status, body) = render(AppError::Validation(fields.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": fields }));
    }

    #[tokio::test]
    async fn test_database_error_hides_detail() {
        let (status, body) =
            render(AppError::Database("connection refused at 10.0.0.7".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Database error occurred" }));
    }

    #[tokio::test]
    async fn test_unstorable_value_hides_detail() {
        let (status, body) = render(AppError::UnstorableValue(
            "BSON does not support unsigned integers".into(),
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({ "error": "Request body contains a value that cannot be stored" })
        );
    }
}
