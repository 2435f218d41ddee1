//! Poster's own listings (`/myAddedJobs`).
//!
//! Stored independently of `/allJobs`; nothing here touches that collection.

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde_json::Value;

use orbit_models::{Collection, DeleteAck, InsertAck, JobPatch, UpdateAck};

use crate::auth::VerifiedIdentity;
use crate::error::ApiResult;
use crate::handlers::common::{self, list_query, EmailQuery};
use crate::state::AppState;

/// GET /myAddedJobs?email=
pub async fn list_added_jobs(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> ApiResult<Json<Vec<Value>>> {
    let query = list_query(Collection::AddedJobs, query.value(), None);
    common::list(&state, Collection::AddedJobs, query).await
}

/// GET /myAddedJobs/:id
pub async fn get_added_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Option<Value>>> {
    common::get_by_id(&state, Collection::AddedJobs, &id).await
}

/// POST /myAddedJobs
pub async fn create_added_job(
    State(state): State<AppState>,
    Extension(identity): Extension<VerifiedIdentity>,
    Json(body): Json<Value>,
) -> ApiResult<Json<InsertAck>> {
    common::create(&state, Collection::AddedJobs, &identity, body).await
}

/// PATCH /myAddedJobs/:id
pub async fn update_added_job(
    State(state): State<AppState>,
    Extension(identity): Extension<VerifiedIdentity>,
    Path(id): Path<String>,
    Json(patch): Json<JobPatch>,
) -> ApiResult<Json<UpdateAck>> {
    common::update_job_fields(&state, Collection::AddedJobs, &identity, &id, patch).await
}

/// DELETE /myAddedJobs/:id
pub async fn delete_added_job(
    State(state): State<AppState>,
    Extension(identity): Extension<VerifiedIdentity>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteAck>> {
    common::delete(&state, Collection::AddedJobs, &identity, &id).await
}
