use mongodb::bson::{Bson, Document};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;
use utoipa::ToSchema;
use validator::Validate;

/// Collection holding user records
pub const USERS_COLLECTION: &str = "users";

pub const USER_CREATED: &str = "User successfully added";
pub const USER_UPDATED: &str = "User updated successfully";
pub const USER_DELETED: &str = "User deleted successfully";
pub const USER_NOT_FOUND: &str = "User not found";
pub const USERS_NOT_FOUND: &str = "Users not found";

/// Email shape accepted at creation: something, `@`, something, `.`, something.
///
/// The whole value must match; this unanchored form is what error messages quote.
pub const EMAIL_RULE: &str = r"[^@]+@[^@]+\.[^@]+";

pub static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{}$", EMAIL_RULE)).unwrap());

/// Known fields of a user record, as submitted.
///
/// Every field is optional here so that a missing value is reported as a
/// validation failure rather than a deserialization error. Fields not listed
/// are kept on the stored document untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewUser {
    #[validate(required, length(max = 100))]
    #[schema(example = "Ada Lovelace", max_length = 100)]
    pub name: Option<String>,

    #[validate(required, regex(path = *EMAIL_PATTERN))]
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,

    #[validate(range(min = 0, max = 120))]
    #[schema(example = 36, minimum = 0, maximum = 120)]
    pub age: Option<i64>,

    #[validate(required, length(min = 8, max = 64))]
    #[schema(example = "correct-horse", min_length = 8, max_length = 64, write_only)]
    pub password: Option<String>,
}

/// Body of a successful creation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedResponse {
    #[schema(example = "User successfully added")]
    pub message: String,
    /// Store-assigned id, as a 24-character hex string
    #[schema(example = "65f1c0ffee0000000000beef")]
    pub user_id: String,
}

/// Body of a successful update or delete
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// One rendered user record
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(value_type = Object)]
    pub message: Value,
}

/// Every rendered user record, in store order
#[derive(Debug, Serialize, ToSchema)]
pub struct UsersResponse {
    #[schema(value_type = Vec<Object>)]
    pub message: Vec<Value>,
}

/// Text form of a stored `_id`, whatever its BSON type.
pub fn id_to_string(id: Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s,
        other => other.into_relaxed_extjson().to_string(),
    }
}

/// Render a stored document for the API: `_id` as a string, no `password`.
pub fn render_user(mut document: Document) -> Value {
    let id = document.remove("_id").map(id_to_string);
    document.remove("password");

    let mut rendered = Bson::Document(document).into_relaxed_extjson();
    if let (Value::Object(fields), Some(id)) = (&mut rendered, id) {
        fields.insert("_id".to_string(), Value::String(id));
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, oid::ObjectId};
    use serde_json::json;

    #[test]
    fn test_email_pattern() {
        assert!(EMAIL_PATTERN.is_match("ada@example.com"));
        assert!(EMAIL_PATTERN.is_match("a.b@c.d.e"));
        assert!(!EMAIL_PATTERN.is_match("bad"));
        assert!(!EMAIL_PATTERN.is_match("ada@example"));
        assert!(!EMAIL_PATTERN.is_match("ada@@example.com"));
        assert!(!EMAIL_PATTERN.is_match("@example.com"));
    }

    #[test]
    fn test_render_user_strips_password_and_stringifies_id() {
        let oid = ObjectId::new();
        let rendered = render_user(doc! {
            "_id": oid,
            "name": "Ada",
            "email": "ada@example.com",
            "age": 36_i64,
            "password": "$argon2id$v=19$...",
            "team": { "role": "admin" },
        });

        assert_eq!(
            rendered,
            json!({
                "_id": oid.to_hex(),
                "name": "Ada",
                "email": "ada@example.com",
                "age": 36,
                "team": { "role": "admin" },
            })
        );
    }

    #[test]
    fn test_id_to_string_handles_foreign_types() {
        assert_eq!(id_to_string(Bson::String("legacy-1".into())), "legacy-1");
        assert_eq!(id_to_string(Bson::Int32(7)), "7");

        let oid = ObjectId::new();
        assert_eq!(id_to_string(Bson::ObjectId(oid)), oid.to_hex());
    }

    #[test]
    fn test_render_user_without_id() {
        let rendered = render_user(doc! { "name": "Ada" });
        assert_eq!(rendered, json!({ "name": "Ada" }));
    }
}
