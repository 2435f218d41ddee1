//! Job listing handlers (`/allJobs`).

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde_json::Value;

use orbit_models::{Collection, DeleteAck, InsertAck, JobPatch, UpdateAck};
use orbit_store::SortSpec;

use crate::auth::VerifiedIdentity;
use crate::error::ApiResult;
use crate::handlers::common::{self, list_query, EmailQuery};
use crate::state::AppState;

/// GET /allJobs?email=
///
/// Newest first by `postedAt`.
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> ApiResult<Json<Vec<Value>>> {
    let query = list_query(
        Collection::AllJobs,
        query.value(),
        Some(SortSpec::descending("postedAt")),
    );
    common::list(&state, Collection::AllJobs, query).await
}

/// GET /allJobs/:id
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Option<Value>>> {
    common::get_by_id(&state, Collection::AllJobs, &id).await
}

/// POST /allJobs
pub async fn create_job(
    State(state): State<AppState>,
    Extension(identity): Extension<VerifiedIdentity>,
    Json(body): Json<Value>,
) -> ApiResult<Json<InsertAck>> {
    common::create(&state, Collection::AllJobs, &identity, body).await
}

/// PATCH /allJobs/:id
pub async fn update_job(
    State(state): State<AppState>,
    Extension(identity): Extension<VerifiedIdentity>,
    Path(id): Path<String>,
    Json(patch): Json<JobPatch>,
) -> ApiResult<Json<UpdateAck>> {
    common::update_job_fields(&state, Collection::AllJobs, &identity, &id, patch).await
}

/// DELETE /allJobs/:id
pub async fn delete_job(
    State(state): State<AppState>,
    Extension(identity): Extension<VerifiedIdentity>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteAck>> {
    common::delete(&state, Collection::AllJobs, &identity, &id).await
}
