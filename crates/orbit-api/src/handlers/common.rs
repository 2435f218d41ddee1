//! Collection operations shared by every resource group.
//!
//! Each helper issues exactly one store call against one collection and
//! renders the result as JSON.

use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use orbit_models::{document_to_json, json_to_document, Collection, DeleteAck, DocId, InsertAck, JobPatch, UpdateAck};
use orbit_store::{FindQuery, SortSpec};

use crate::auth::VerifiedIdentity;
use crate::error::ApiResult;
use crate::state::AppState;

/// `?email=` filter on list routes.
#[derive(Debug, Default, Deserialize)]
pub struct EmailQuery {
    #[serde(default)]
    pub email: Option<String>,
}

impl EmailQuery {
    /// The filter value; an empty string counts as absent.
    pub fn value(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.is_empty())
    }
}

/// Build the list query for a collection.
pub fn list_query(collection: Collection, email: Option<&str>, sort: Option<SortSpec>) -> FindQuery {
    let mut query = FindQuery::all();
    if let (Some(field), Some(email)) = (collection.filter_field(), email) {
        query = query.with_equals(field, email);
    }
    if let Some(sort) = sort {
        query = query.sorted(sort);
    }
    query
}

pub async fn list(state: &AppState, collection: Collection, query: FindQuery) -> ApiResult<Json<Vec<Value>>> {
    let docs = state.store.find(collection, query).await?;
    Ok(Json(docs.iter().map(document_to_json).collect()))
}

/// Fetch one document; JSON `null` when no document has this id.
pub async fn get_by_id(state: &AppState, collection: Collection, id: &str) -> ApiResult<Json<Option<Value>>> {
    let id = DocId::parse(id)?;
    let doc = state.store.find_by_id(collection, id).await?;
    Ok(Json(doc.as_ref().map(document_to_json)))
}

/// Insert the request body verbatim.
pub async fn create(
    state: &AppState,
    collection: Collection,
    identity: &VerifiedIdentity,
    body: Value,
) -> ApiResult<Json<InsertAck>> {
    let doc = json_to_document(body)?;
    let ack = state.store.insert_one(collection, doc).await?;
    info!(
        collection = %collection,
        uid = %identity.uid,
        inserted_id = %ack.inserted_id,
        "Created document"
    );
    Ok(Json(ack))
}

/// Overwrite the four editable job fields. No existence check.
pub async fn update_job_fields(
    state: &AppState,
    collection: Collection,
    identity: &VerifiedIdentity,
    id: &str,
    patch: JobPatch,
) -> ApiResult<Json<UpdateAck>> {
    let id = DocId::parse(id)?;
    let set = patch.to_set_document();
    let ack = state.store.set_fields(collection, id, set).await?;
    info!(
        collection = %collection,
        uid = %identity.uid,
        id = %id,
        matched = ack.matched_count,
        "Updated job fields"
    );
    Ok(Json(ack))
}

pub async fn delete(
    state: &AppState,
    collection: Collection,
    identity: &VerifiedIdentity,
    id: &str,
) -> ApiResult<Json<DeleteAck>> {
    let id = DocId::parse(id)?;
    let ack = state.store.delete_one(collection, id).await?;
    info!(
        collection = %collection,
        uid = %identity.uid,
        id = %id,
        deleted = ack.deleted_count,
        "Deleted document"
    );
    Ok(Json(ack))
}
