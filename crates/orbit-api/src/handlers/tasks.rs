//! Accepted task handlers (`/myTasks`).

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde_json::Value;
use tracing::{info, warn};

use orbit_models::{ensure_not_self_acceptance, json_to_document, Collection, DeleteAck, InsertAck};

use crate::auth::VerifiedIdentity;
use crate::error::ApiResult;
use crate::handlers::common::{self, list_query, EmailQuery};
use crate::state::AppState;

/// GET /myTasks?email=
///
/// Filters on `workerEmail`.
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> ApiResult<Json<Vec<Value>>> {
    let query = list_query(Collection::Tasks, query.value(), None);
    common::list(&state, Collection::Tasks, query).await
}

/// POST /myTasks
///
/// Returns:
/// - 200: insert acknowledgment
/// - 400: worker and client are the same person; nothing is stored
pub async fn accept_task(
    State(state): State<AppState>,
    Extension(identity): Extension<VerifiedIdentity>,
    Json(body): Json<Value>,
) -> ApiResult<Json<InsertAck>> {
    let task = json_to_document(body)?;

    if let Err(e) = ensure_not_self_acceptance(&task) {
        warn!(uid = %identity.uid, "Rejected self-acceptance");
        return Err(e.into());
    }

    let ack = state.store.insert_one(Collection::Tasks, task).await?;
    info!(uid = %identity.uid, inserted_id = %ack.inserted_id, "Task accepted");
    Ok(Json(ack))
}

/// DELETE /myTasks/:id
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(identity): Extension<VerifiedIdentity>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteAck>> {
    common::delete(&state, Collection::Tasks, &identity, &id).await
}
