use async_trait::async_trait;
use mongodb::bson::{Bson, Document, oid::ObjectId};

use crate::error::UserResult;

/// Persistence for user documents.
///
/// Documents are schemaless: the store keeps every field it is given and
/// returns documents as stored. Natural (insertion) order is used for listing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert one document, returning its `_id` (generated when absent)
    async fn insert(&self, document: Document) -> UserResult<Bson>;

    async fn find_by_id(&self, id: ObjectId) -> UserResult<Option<Document>>;

    async fn find_all(&self) -> UserResult<Vec<Document>>;

    /// `$set` the given fields; `false` when no document has this id
    async fn update_fields(&self, id: ObjectId, fields: Document) -> UserResult<bool>;

    /// `false` when no document has this id
    async fn delete(&self, id: ObjectId) -> UserResult<bool>;
}
