//! Type-safe error codes for structured logs.
//!
//! Each code has a SCREAMING_SNAKE_CASE identifier, an integer for monitoring
//! and a default human-readable message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::ValidationError;
//! assert_eq!(code.as_str(), "VALIDATION_ERROR");
//! assert_eq!(code.code(), 1001);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standardized error codes.
///
/// Codes are attached to log events as `error_code`; response bodies carry
/// only the `{"error": ...}` envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Request validation failed
    ValidationError,

    /// Request body is not a JSON object
    InvalidJson,

    /// Request could not be understood
    BadRequest,

    /// Requested resource was not found
    NotFound,

    /// JSON extraction from request body failed
    JsonExtraction,

    /// Request body holds a value the store cannot represent
    UnstorableValue,

    // Database errors (2000-2999)
    /// Database connection or query error
    DatabaseError,

    // Credential errors (6000s)
    /// Password hashing failed
    CredentialHash,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidJson => "INVALID_JSON",
            Self::BadRequest => "BAD_REQUEST",
            Self::NotFound => "NOT_FOUND",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::UnstorableValue => "UNSTORABLE_VALUE",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::CredentialHash => "CREDENTIAL_HASH",
        }
    }

    /// Integer code for logging and monitoring.
    ///
    /// - 1000-1999: Client errors
    /// - 2000-2999: Database errors
    /// - 6000-6999: Credential errors
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::BadRequest => 1002,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::InvalidJson => 1010,
            Self::UnstorableValue => 1012,

            Self::DatabaseError => 2003,

            Self::CredentialHash => 6001,
        }
    }

    /// Message returned to clients when the specific cause must stay in the logs.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidJson => "Request body must be a JSON object",
            Self::BadRequest => "Bad request",
            Self::NotFound => "Resource not found",
            Self::JsonExtraction => "Failed to parse request body",
            Self::UnstorableValue => "Request body contains a value that cannot be stored",
            Self::DatabaseError => "Database error occurred",
            Self::CredentialHash => "Failed to process credentials",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_string_representation() {
        assert_eq!(ErrorCode::ValidationError.as_str(), "VALIDATION_ERROR");
        assert_eq!(ErrorCode::NotFound.as_str(), "NOT_FOUND");
        assert_eq!(ErrorCode::DatabaseError.as_str(), "DATABASE_ERROR");
    }

    #[test]
    fn test_error_code_integer_codes() {
        assert_eq!(ErrorCode::ValidationError.code(), 1001);
        assert_eq!(ErrorCode::DatabaseError.code(), 2003);
        assert_eq!(ErrorCode::UnstorableValue.code(), 1012);
        assert_eq!(ErrorCode::CredentialHash.code(), 6001);
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::InvalidJson.to_string(), "INVALID_JSON");
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::ValidationError).unwrap();
        assert_eq!(json, "\"VALIDATION_ERROR\"");

        let code: ErrorCode = serde_json::from_str("\"NOT_FOUND\"").unwrap();
        assert_eq!(code, ErrorCode::NotFound);
    }
}
