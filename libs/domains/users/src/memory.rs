//! In-process [`UserStore`] used by tests and local runs without MongoDB.

use async_trait::async_trait;
use mongodb::bson::{Bson, Document, oid::ObjectId};
use tokio::sync::RwLock;
use tracing::instrument;

use crate::error::{UserError, UserResult};
use crate::repository::UserStore;

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    documents: RwLock<Vec<Document>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

fn has_id(document: &Document, id: &Bson) -> bool {
    document.get("_id") == Some(id)
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    #[instrument(skip(self, document))]
    async fn insert(&self, mut document: Document) -> UserResult<Bson> {
        let mut documents = self.documents.write().await;

        let id = match document.get("_id") {
            Some(id) => id.clone(),
            None => {
                let id = Bson::ObjectId(ObjectId::new());
                document.insert("_id", id.clone());
                id
            }
        };

        if documents.iter().any(|existing| has_id(existing, &id)) {
            return Err(UserError::Store(format!("duplicate key: _id {}", id)));
        }

        documents.push(document);
        Ok(id)
    }

    #[instrument(skip(self), fields(user_id = %id))]
    async fn find_by_id(&self, id: ObjectId) -> UserResult<Option<Document>> {
        let id = Bson::ObjectId(id);
        let documents = self.documents.read().await;
        Ok(documents.iter().find(|d| has_id(d, &id)).cloned())
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> UserResult<Vec<Document>> {
        Ok(self.documents.read().await.clone())
    }

    #[instrument(skip(self, fields), fields(user_id = %id))]
    async fn update_fields(&self, id: ObjectId, fields: Document) -> UserResult<bool> {
        let id = Bson::ObjectId(id);
        let mut documents = self.documents.write().await;

        let Some(document) = documents.iter_mut().find(|d| has_id(d, &id)) else {
            return Ok(false);
        };

        if fields.get("_id").is_some_and(|new_id| new_id != &id) {
            return Err(UserError::Store(
                "Performing an update on the path '_id' would modify the immutable field '_id'"
                    .to_string(),
            ));
        }

        for (key, value) in fields {
            document.insert(key, value);
        }
        Ok(true)
    }

    #[instrument(skip(self), fields(user_id = %id))]
    async fn delete(&self, id: ObjectId) -> UserResult<bool> {
        let id = Bson::ObjectId(id);
        let mut documents = self.documents.write().await;

        match documents.iter().position(|d| has_id(d, &id)) {
            Some(index) => {
                documents.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
