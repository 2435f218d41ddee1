//! In-memory document store.
//!
//! Mirrors the observable behavior of [`MongoStore`](crate::MongoStore) for
//! the operations this service issues: generated ObjectIds, equality
//! filters, single-field sort with missing values lowest, limit, `$set`
//! and a unique `_id` per collection.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document};
use tokio::sync::RwLock;

use orbit_models::{Collection, DeleteAck, DocId, InsertAck, UpdateAck};

use crate::error::{StoreError, StoreResult};
use crate::query::FindQuery;
use crate::store::DocumentStore;

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Equality match; a null filter value also matches a missing field.
fn matches(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(k, v)| match v {
        Bson::Null => doc.get(k).map_or(true, |x| *x == Bson::Null),
        _ => doc.get(k) == Some(v),
    })
}

fn has_id(doc: &Document, id: DocId) -> bool {
    matches!(doc.get("_id"), Some(Bson::ObjectId(oid)) if *oid == id.object_id())
}

/// Rank of a value's type in sort order; missing and null sort lowest.
fn type_rank(value: Option<&Bson>) -> u8 {
    match value {
        None | Some(Bson::Null) | Some(Bson::Undefined) => 0,
        Some(Bson::Int32(_)) | Some(Bson::Int64(_)) | Some(Bson::Double(_)) => 1,
        Some(Bson::String(_)) => 2,
        Some(Bson::Document(_)) => 3,
        Some(Bson::Array(_)) => 4,
        Some(Bson::ObjectId(_)) => 5,
        Some(Bson::Boolean(_)) => 6,
        Some(Bson::DateTime(_)) => 7,
        Some(_) => 8,
    }
}

fn as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(i) => Some(f64::from(*i)),
        Bson::Int64(i) => Some(*i as f64),
        Bson::Double(f) => Some(*f),
        _ => None,
    }
}

fn compare_values(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    let by_type = type_rank(a).cmp(&type_rank(b));
    if by_type != Ordering::Equal {
        return by_type;
    }
    match (a, b) {
        (Some(Bson::String(x)), Some(Bson::String(y))) => x.cmp(y),
        (Some(Bson::ObjectId(x)), Some(Bson::ObjectId(y))) => x.cmp(y),
        (Some(Bson::Boolean(x)), Some(Bson::Boolean(y))) => x.cmp(y),
        (Some(Bson::DateTime(x)), Some(Bson::DateTime(y))) => x.cmp(y),
        (Some(x), Some(y)) => match (as_f64(x), as_f64(y)) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, collection: Collection, query: FindQuery) -> StoreResult<Vec<Document>> {
        let filter = query.filter_document();
        let collections = self.collections.read().await;
        let mut docs: Vec<Document> = collections
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| matches(d, &filter)).cloned().collect())
            .unwrap_or_default();

        if let Some(sort) = &query.sort {
            docs.sort_by(|a, b| {
                let ord = compare_values(a.get(&sort.field), b.get(&sort.field));
                if sort.descending {
                    ord.reverse()
                } else {
                    ord
                }
            });
        }
        if let Some(limit) = query.limit.filter(|l| *l > 0) {
            docs.truncate(limit as usize);
        }
        Ok(docs)
    }

    async fn find_one(&self, collection: Collection, filter: Document) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|d| matches(d, &filter)).cloned()))
    }

    async fn insert_one(&self, collection: Collection, document: Document) -> StoreResult<InsertAck> {
        let existing = document.get("_id").cloned();
        let (id, stored) = match existing {
            Some(id) => (id, document),
            None => {
                let id = Bson::ObjectId(ObjectId::new());
                let mut stored = Document::new();
                stored.insert("_id", id.clone());
                for (k, v) in document {
                    stored.insert(k, v);
                }
                (id, stored)
            }
        };

        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();
        // `_id` is unique per collection.
        if docs.iter().any(|d| d.get("_id") == Some(&id)) {
            return Err(StoreError::DuplicateKey(format!("{} _id {}", collection, id)));
        }
        docs.push(stored);
        Ok(InsertAck::new(&id))
    }

    async fn set_fields(&self, collection: Collection, id: DocId, set: Document) -> StoreResult<UpdateAck> {
        let mut collections = self.collections.write().await;
        let Some(doc) = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|d| has_id(d, id)))
        else {
            return Ok(UpdateAck::new(0, 0));
        };

        let mut modified = false;
        for (k, v) in set {
            if doc.get(&k) != Some(&v) {
                doc.insert(k, v);
                modified = true;
            }
        }
        Ok(UpdateAck::new(1, u64::from(modified)))
    }

    async fn delete_one(&self, collection: Collection, id: DocId) -> StoreResult<DeleteAck> {
        let mut collections = self.collections.write().await;
        let deleted = match collections.get_mut(&collection) {
            Some(docs) => match docs.iter().position(|d| has_id(d, id)) {
                Some(index) => {
                    docs.remove(index);
                    1
                }
                None => 0,
            },
            None => 0,
        };
        Ok(DeleteAck::new(deleted))
    }

    async fn count(&self, collection: Collection, filter: Document) -> StoreResult<u64> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| matches(d, &filter)).count() as u64)
            .unwrap_or(0))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
