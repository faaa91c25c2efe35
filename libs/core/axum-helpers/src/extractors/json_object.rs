//! Extractor for request bodies that must be a JSON object.

use crate::errors::{AppError, ErrorCode};
use axum::extract::{FromRequest, Json, Request};
use serde_json::{Map, Value};

/// JSON object body with its keys in arrival order.
///
/// Rejects with a 400 `{"error": ...}` envelope when the body is not JSON or
/// is JSON of another shape (array, string, number, `null`).
///
/// ```ignore
/// use axum_helpers::extractors::JsonObject;
///
/// async fn update(JsonObject(fields): JsonObject) -> String {
///     format!("{} fields", fields.len())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct JsonObject(pub Map<String, Value>);

impl<S> FromRequest<S> for JsonObject
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state).await?;

        match value {
            Value::Object(map) => Ok(JsonObject(map)),
            _ => Err(AppError::BadRequest(
                ErrorCode::InvalidJson.default_message().to_string(),
            )),
        }
    }
}
