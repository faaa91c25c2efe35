//! MongoDB implementation of UserStore

use async_trait::async_trait;
use database::mongodb::ConnectionProvider;
use futures::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::{Bson, Document, doc, oid::ObjectId},
};
use tracing::instrument;

use crate::error::{UserError, UserResult};
use crate::models::USERS_COLLECTION;
use crate::repository::UserStore;

/// User documents in MongoDB, one store handle per unit of work.
///
/// ```ignore
/// let provider = ConnectionProvider::per_request(MongoConfig::from_env()?.in_database("userDb"));
/// let store = MongoUserStore::new(provider);
/// ```
#[derive(Clone, Debug)]
pub struct MongoUserStore {
    provider: ConnectionProvider,
    collection: String,
}

impl MongoUserStore {
    pub fn new(provider: ConnectionProvider) -> Self {
        Self::with_collection(provider, USERS_COLLECTION)
    }

    /// Create a store over a custom collection name
    pub fn with_collection(provider: ConnectionProvider, collection: &str) -> Self {
        Self {
            provider,
            collection: collection.to_string(),
        }
    }

    pub fn provider(&self) -> &ConnectionProvider {
        &self.provider
    }

    fn users(&self, db: &Database) -> Collection<Document> {
        db.collection::<Document>(&self.collection)
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    #[instrument(skip(self, document), fields(collection = %self.collection))]
    async fn insert(&self, document: Document) -> UserResult<Bson> {
        let id = self
            .provider
            .scoped(|db| async move {
                let result = self.users(&db).insert_one(document).await?;
                Ok::<_, UserError>(result.inserted_id)
            })
            .await?;

        tracing::info!(user_id = %id, "User created successfully");
        Ok(id)
    }

    #[instrument(skip(self), fields(user_id = %id))]
    async fn find_by_id(&self, id: ObjectId) -> UserResult<Option<Document>> {
        self.provider
            .scoped(|db| async move {
                let found = self.users(&db).find_one(doc! { "_id": id }).await?;
                Ok::<_, UserError>(found)
            })
            .await
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> UserResult<Vec<Document>> {
        self.provider
            .scoped(|db| async move {
                let cursor = self.users(&db).find(doc! {}).await?;
                let users: Vec<Document> = cursor.try_collect().await?;
                Ok::<_, UserError>(users)
            })
            .await
    }

    #[instrument(skip(self, fields), fields(user_id = %id))]
    async fn update_fields(&self, id: ObjectId, fields: Document) -> UserResult<bool> {
        let matched = self
            .provider
            .scoped(|db| async move {
                let users = self.users(&db);
                // The server rejects an empty `$set`; nothing to write still needs a match.
                if fields.is_empty() {
                    let count = users.count_documents(doc! { "_id": id }).await?;
                    return Ok::<_, UserError>(count > 0);
                }
                let result = users
                    .update_one(doc! { "_id": id }, doc! { "$set": fields })
                    .await?;
                Ok(result.matched_count > 0)
            })
            .await?;

        if matched {
            tracing::info!("User updated successfully");
        }
        Ok(matched)
    }

    #[instrument(skip(self), fields(user_id = %id))]
    async fn delete(&self, id: ObjectId) -> UserResult<bool> {
        let deleted = self
            .provider
            .scoped(|db| async move {
                let result = self.users(&db).delete_one(doc! { "_id": id }).await?;
                Ok::<_, UserError>(result.deleted_count > 0)
            })
            .await?;

        if deleted {
            tracing::info!("User deleted successfully");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::mongodb::MongoConfig;
    use test_utils::{TestDataBuilder, TestMongo};

    fn store_for(mongo: &TestMongo, test_name: &str) -> MongoUserStore {
        let builder = TestDataBuilder::from_test_name(test_name);
        let config = MongoConfig::new(mongo.connection_string()).in_database(builder.database_name());
        MongoUserStore::new(ConnectionProvider::per_request(config))
    }

    #[tokio::test]
    async fn test_crud_round_trip_against_mongodb() {
        let mongo = TestMongo::new().await;
        let store = store_for(&mongo, "test_crud_round_trip_against_mongodb");

        assert!(store.find_all().await.unwrap().is_empty());

        let id = store
            .insert(doc! { "name": "Ada", "email": "ada@example.com", "age": 35_i64 })
            .await
            .unwrap();
        let Bson::ObjectId(oid) = id else {
            panic!("expected an ObjectId, got {:?}", id);
        };

        assert!(store.update_fields(oid, doc! { "age": 36_i64 }).await.unwrap());
        let found = store.find_by_id(oid).await.unwrap().unwrap();
        assert_eq!(found.get_str("name").unwrap(), "Ada");
        assert_eq!(found.get_i64("age").unwrap(), 36);

        assert_eq!(store.find_all().await.unwrap().len(), 1);

        assert!(store.delete(oid).await.unwrap());
        assert!(store.find_by_id(oid).await.unwrap().is_none());
        assert!(!store.delete(oid).await.unwrap());
        assert!(!store.update_fields(oid, doc! { "age": 1_i64 }).await.unwrap());
        assert!(!store.update_fields(oid, doc! {}).await.unwrap());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_store_error() {
        let mut config = MongoConfig::new("mongodb://127.0.0.1:1/").in_database("userDb");
        config.server_selection_timeout_secs = 1;
        let store = MongoUserStore::new(ConnectionProvider::per_request(config));

        let result = store.find_all().await;
        assert!(matches!(result, Err(UserError::Store(_))));
    }
}
