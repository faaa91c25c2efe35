//! Field-level validation of user bodies.
//!
//! Checks run in two passes. The first catches `null` values and wrong JSON
//! types on the known fields. The second runs the `validator` rules declared on
//! [`NewUser`] over the well-typed values. Every failure is collected, keyed by
//! field name; a field that failed the first pass is not reported again.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::NewUser;

/// Reasons keyed by field name
pub type FieldErrors = BTreeMap<String, Vec<String>>;

pub const REQUIRED_FIELD: &str = "required field";
pub const NULL_NOT_ALLOWED: &str = "null value not allowed";
pub const MUST_BE_STRING: &str = "must be of string type";
pub const MUST_BE_INTEGER: &str = "must be of integer type";
pub const READ_ONLY: &str = "field is read-only";

#[derive(Clone, Copy)]
enum Kind {
    String,
    Integer,
}

const KNOWN_FIELDS: [(&str, Kind); 4] = [
    ("name", Kind::String),
    ("email", Kind::String),
    ("age", Kind::Integer),
    ("password", Kind::String),
];

/// Validate a creation body. Unknown fields are ignored, not rejected.
///
/// `_id` is assigned by the store and may not be supplied.
pub fn validate_new_user(body: &Map<String, Value>) -> Result<NewUser, FieldErrors> {
    let mut errors = type_errors(body);

    if body.contains_key("_id") {
        errors.insert("_id".to_string(), vec![READ_ONLY.to_string()]);
    }
    let user = typed_view(body);

    if let Err(e) = user.validate() {
        merge(&mut errors, &e, false);
    }

    if errors.is_empty() {
        Ok(user)
    } else {
        Err(errors)
    }
}

/// Validate only the known fields present in an update body.
///
/// Missing fields are fine; `_id` may not be set.
pub fn validate_partial(body: &Map<String, Value>) -> Result<(), FieldErrors> {
    let mut errors = type_errors(body);

    if body.contains_key("_id") {
        errors.insert("_id".to_string(), vec![READ_ONLY.to_string()]);
    }

    if let Err(e) = typed_view(body).validate() {
        merge(&mut errors, &e, true);
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn type_errors(body: &Map<String, Value>) -> FieldErrors {
    KNOWN_FIELDS
        .iter()
        .filter_map(|(field, kind)| {
            let value = body.get(*field)?;
            let reason = match (kind, value) {
                (_, Value::Null) => NULL_NOT_ALLOWED,
                (Kind::String, Value::String(_)) => return None,
                (Kind::String, _) => MUST_BE_STRING,
                (Kind::Integer, Value::Number(n)) if n.is_i64() || n.is_u64() => return None,
                (Kind::Integer, _) => MUST_BE_INTEGER,
            };
            Some((field.to_string(), vec![reason.to_string()]))
        })
        .collect()
}

/// The known fields that carry a value of the right type
fn typed_view(body: &Map<String, Value>) -> NewUser {
    let text = |field: &str| body.get(field).and_then(Value::as_str).map(str::to_string);

    NewUser {
        name: text("name"),
        email: text("email"),
        // Integers beyond i64 still have to fail the range check.
        age: body
            .get("age")
            .and_then(Value::as_number)
            .and_then(|n| n.as_i64().or_else(|| n.as_u64().map(|_| i64::MAX))),
        password: text("password"),
    }
}

fn merge(errors: &mut FieldErrors, found: &ValidationErrors, skip_required: bool) {
    for (field, failures) in found.field_errors() {
        let field = field.to_string();
        if errors.contains_key(&field) {
            continue;
        }

        let reasons: Vec<String> = failures
            .iter()
            .filter(|failure| !(skip_required && failure.code == "required"))
            .map(describe)
            .collect();

        if !reasons.is_empty() {
            errors.insert(field, reasons);
        }
    }
}

fn describe(failure: &ValidationError) -> String {
    let bound = |key: &str| failure.params.get(key).cloned();

    match failure.code.as_ref() {
        "required" => REQUIRED_FIELD.to_string(),
        "length" => {
            let length = failure
                .params
                .get("value")
                .and_then(Value::as_str)
                .map(|s| s.chars().count() as u64);
            match (length, bound("min").and_then(|v| v.as_u64())) {
                (Some(length), Some(min)) if length < min => format!("min length is {}", min),
                _ => format!("max length is {}", bound("max").unwrap_or(Value::Null)),
            }
        }
        "range" => {
            let value = failure.params.get("value").and_then(Value::as_i64);
            match (value, bound("min").and_then(|v| v.as_f64())) {
                (Some(value), Some(min)) if (value as f64) < min => {
                    format!("min value is {}", bound("min").unwrap_or(Value::Null))
                }
                _ => format!("max value is {}", bound("max").unwrap_or(Value::Null)),
            }
        }
        "regex" => format!(
            "value does not match regex '{}'",
            crate::models::EMAIL_RULE
        ),
        other => failure
            .message
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| other.to_string()),
    }
}
