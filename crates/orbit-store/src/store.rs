//! The store abstraction the HTTP layer is written against.

use async_trait::async_trait;
use mongodb::bson::{doc, Document};

use orbit_models::{Collection, DeleteAck, DocId, InsertAck, UpdateAck};

use crate::error::StoreResult;
use crate::query::FindQuery;

/// Single-collection document operations.
///
/// Every method issues exactly one call against one collection.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents matching the query.
    async fn find(&self, collection: Collection, query: FindQuery) -> StoreResult<Vec<Document>>;

    /// First document matching an equality filter.
    async fn find_one(&self, collection: Collection, filter: Document) -> StoreResult<Option<Document>>;

    /// Insert a document as given. An `_id` is generated when absent.
    async fn insert_one(&self, collection: Collection, document: Document) -> StoreResult<InsertAck>;

    /// `$set` the given fields on the document with this id. Never upserts.
    async fn set_fields(&self, collection: Collection, id: DocId, set: Document) -> StoreResult<UpdateAck>;

    /// Delete the document with this id.
    async fn delete_one(&self, collection: Collection, id: DocId) -> StoreResult<DeleteAck>;

    /// Number of documents matching an equality filter.
    async fn count(&self, collection: Collection, filter: Document) -> StoreResult<u64>;

    /// Round-trip to the server.
    async fn ping(&self) -> StoreResult<()>;

    async fn find_by_id(&self, collection: Collection, id: DocId) -> StoreResult<Option<Document>> {
        self.find_one(collection, id_filter(id)).await
    }
}

pub(crate) fn id_filter(id: DocId) -> Document {
    doc! { "_id": id.object_id() }
}
