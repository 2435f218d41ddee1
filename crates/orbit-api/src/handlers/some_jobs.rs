//! Featured job handlers (`/someJobs`).

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde_json::Value;

use orbit_models::{Collection, InsertAck};
use orbit_store::{FindQuery, SortSpec};

use crate::auth::VerifiedIdentity;
use crate::error::ApiResult;
use crate::handlers::common;
use crate::state::AppState;

/// Maximum number of featured jobs returned.
pub const FEATURED_JOBS_LIMIT: i64 = 6;

/// GET /someJobs
///
/// The most recently inserted jobs, newest first.
pub async fn list_featured_jobs(State(state): State<AppState>) -> ApiResult<Json<Vec<Value>>> {
    let query = FindQuery::all()
        .sorted(SortSpec::descending("_id"))
        .limited(FEATURED_JOBS_LIMIT);
    common::list(&state, Collection::SomeJobs, query).await
}

/// GET /someJobs/:id
pub async fn get_featured_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Option<Value>>> {
    common::get_by_id(&state, Collection::SomeJobs, &id).await
}

/// POST /someJobs
pub async fn create_featured_job(
    State(state): State<AppState>,
    Extension(identity): Extension<VerifiedIdentity>,
    Json(body): Json<Value>,
) -> ApiResult<Json<InsertAck>> {
    common::create(&state, Collection::SomeJobs, &identity, body).await
}
