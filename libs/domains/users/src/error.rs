use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use database::mongodb::MongoError;
use serde_json::{Value, json};
use thiserror::Error;

use crate::models::{USER_NOT_FOUND, USERS_NOT_FOUND};
use crate::schema::FieldErrors;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Users not found")]
    NoUsers,

    #[error("Validation failed: {0:?}")]
    Validation(FieldErrors),

    /// The body parsed as JSON but has no BSON representation
    #[error("Unstorable body: {0}")]
    UnstorableBody(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),
}

pub type UserResult<T> = Result<T, UserError>;

/// Convert UserError to AppError for standardized error responses
impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound => AppError::NotFound(USER_NOT_FOUND.to_string()),
            UserError::NoUsers => AppError::NotFound(USERS_NOT_FOUND.to_string()),
            UserError::Validation(fields) => AppError::Validation(Value::Object(
                fields
                    .into_iter()
                    .map(|(field, reasons)| (field, json!(reasons)))
                    .collect(),
            )),
            UserError::UnstorableBody(detail) => AppError::UnstorableValue(detail),
            UserError::Store(msg) => AppError::Database(msg),
            UserError::PasswordHash(msg) => AppError::Credential(msg),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<MongoError> for UserError {
    fn from(err: MongoError) -> Self {
        UserError::Store(err.to_string())
    }
}

impl From<mongodb::error::Error> for UserError {
    fn from(err: mongodb::error::Error) -> Self {
        UserError::Store(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for UserError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        UserError::UnstorableBody(err.to_string())
    }
}
