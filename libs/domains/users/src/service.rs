//! User Service - validation, hashing and store orchestration

use mongodb::bson::{Document, oid::ObjectId, to_document};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::instrument;

use crate::error::{UserError, UserResult};
use crate::models::{id_to_string, render_user};
use crate::password::hash_password;
use crate::repository::UserStore;
use crate::schema::{self, FieldErrors, REQUIRED_FIELD};

/// User service providing the five record operations
///
/// Every operation performs at most one store call.
pub struct UserService<S: UserStore> {
    store: Arc<S>,
    strict_updates: bool,
}

impl<S: UserStore> UserService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
            strict_updates: false,
        }
    }

    /// Validate known fields, hash `password` and forbid `_id` on update
    pub fn with_strict_updates(mut self, strict: bool) -> Self {
        self.strict_updates = strict;
        self
    }

    pub fn strict_updates(&self) -> bool {
        self.strict_updates
    }

    /// Validate, hash the password and insert. Returns the new id as a string.
    #[instrument(skip(self, body))]
    pub async fn create_user(&self, body: Map<String, Value>) -> UserResult<String> {
        let user = schema::validate_new_user(&body).map_err(UserError::Validation)?;
        let password = user.password.as_deref().ok_or_else(|| {
            UserError::Validation(FieldErrors::from([(
                "password".to_string(),
                vec![REQUIRED_FIELD.to_string()],
            )]))
        })?;

        let mut document = to_document(&body)?;
        document.insert("password", hash_password(password)?);

        let id = self.store.insert(document).await?;
        Ok(id_to_string(id))
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: &str) -> UserResult<Value> {
        let id = parse_id(id)?;

        self.store
            .find_by_id(id)
            .await?
            .map(render_user)
            .ok_or(UserError::NotFound)
    }

    /// Every user in store order; an empty store is reported as [`UserError::NoUsers`]
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> UserResult<Vec<Value>> {
        let users = self.store.find_all().await?;

        if users.is_empty() {
            return Err(UserError::NoUsers);
        }
        Ok(users.into_iter().map(render_user).collect())
    }

    /// `$set` the given fields on an existing user.
    ///
    /// Fields are merged as supplied unless strict updates are enabled.
    #[instrument(skip(self, body))]
    pub async fn update_user(&self, id: &str, body: Map<String, Value>) -> UserResult<()> {
        let id = parse_id(id)?;

        if self.strict_updates {
            schema::validate_partial(&body).map_err(UserError::Validation)?;
        }

        let mut fields: Document = to_document(&body)?;
        let new_password = body
            .get("password")
            .and_then(Value::as_str)
            .filter(|_| self.strict_updates);
        if let Some(password) = new_password {
            fields.insert("password", hash_password(password)?);
        }

        if self.store.update_fields(id, fields).await? {
            Ok(())
        } else {
            Err(UserError::NotFound)
        }
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: &str) -> UserResult<()> {
        let id = parse_id(id)?;

        if self.store.delete(id).await? {
            Ok(())
        } else {
            Err(UserError::NotFound)
        }
    }
}

impl<S: UserStore> Clone for UserService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            strict_updates: self.strict_updates,
        }
    }
}

/// Ids that are not 24-character hex cannot name a user.
fn parse_id(id: &str) -> UserResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| {
        tracing::debug!(user_id = %id, "Malformed user id");
        UserError::NotFound
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryUserStore;
    use crate::password::verify_password;
    use crate::repository::MockUserStore;
    use mongodb::bson::{Bson, doc};
    use serde_json::json;

    fn body(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test body must be an object"),
        }
    }

    fn ada() -> Map<String, Value> {
        body(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "age": 36,
            "password": "correct-horse",
        }))
    }

    #[tokio::test]
    async fn test_create_hashes_password_before_insert() {
        let mut store = MockUserStore::new();
        let oid = ObjectId::new();
        store
            .expect_insert()
            .withf(|document| {
                let stored = document.get_str("password").unwrap_or_default();
                stored != "correct-horse"
                    && verify_password("correct-horse", stored).unwrap_or(false)
            })
            .times(1)
            .returning(move |_| Ok(Bson::ObjectId(oid)));

        let service = UserService::new(store);
        let id = service.create_user(ada()).await.unwrap();
        assert_eq!(id, oid.to_hex());
    }

    #[tokio::test]
    async fn test_create_invalid_body_never_touches_store() {
        let mut store = MockUserStore::new();
        store.expect_insert().never();

        let service = UserService::new(store);
        let result = service.create_user(body(json!({ "name": "Ada" }))).await;

        let Err(UserError::Validation(errors)) = result else {
            panic!("expected validation errors");
        };
        assert!(errors.contains_key("email"));
        assert!(errors.contains_key("password"));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut store = MockUserStore::new();
        store
            .expect_find_all()
            .returning(|| Err(UserError::Store("server selection timeout".into())));

        let service = UserService::new(store);
        assert!(matches!(
            service.list_users().await,
            Err(UserError::Store(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_id_is_not_found_without_store_call() {
        let mut store = MockUserStore::new();
        store.expect_find_by_id().never();
        store.expect_update_fields().never();
        store.expect_delete().never();

        let service = UserService::new(store);
        assert!(matches!(service.get_user("nope").await, Err(UserError::NotFound)));
        assert!(matches!(
            service.update_user("123", Map::new()).await,
            Err(UserError::NotFound)
        ));
        assert!(matches!(
            service.delete_user("zzzzzzzzzzzzzzzzzzzzzzzz").await,
            Err(UserError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_permissive_update_merges_as_supplied() {
        let service = UserService::new(InMemoryUserStore::new());
        let id = service.create_user(ada()).await.unwrap();

        service
            .update_user(&id, body(json!({ "age": "unknown", "password": "x" })))
            .await
            .unwrap();

        let user = service.get_user(&id).await.unwrap();
        assert_eq!(user["age"], "unknown");
        assert_eq!(user["name"], "Ada");
    }

    #[tokio::test]
    async fn test_strict_update_validates_and_hashes() {
        let store = InMemoryUserStore::new();
        let oid = ObjectId::new();
        store
            .insert(doc! { "_id": oid, "name": "Ada", "password": "old" })
            .await
            .unwrap();
        let service = UserService::new(store).with_strict_updates(true);
        let id = oid.to_hex();

        let result = service.update_user(&id, body(json!({ "age": 500 }))).await;
        assert!(matches!(result, Err(UserError::Validation(_))));

        let result = service.update_user(&id, body(json!({ "_id": id.clone() }))).await;
        assert!(matches!(result, Err(UserError::Validation(_))));

        service
            .update_user(&id, body(json!({ "password": "battery-staple" })))
            .await
            .unwrap();

        let stored = service.store.find_by_id(oid).await.unwrap().unwrap();
        let hash = stored.get_str("password").unwrap();
        assert!(verify_password("battery-staple", hash).unwrap());
    }

    #[tokio::test]
    async fn test_list_users_empty_store() {
        let service = UserService::new(InMemoryUserStore::new());
        assert!(matches!(service.list_users().await, Err(UserError::NoUsers)));
    }
}
