//! User handlers.

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde_json::Value;
use tracing::info;

use orbit_models::{doc, json_to_document, Bson, Collection, InsertAck};

use crate::auth::VerifiedIdentity;
use crate::error::ApiResult;
use crate::handlers::common::{self, list_query, EmailQuery};
use crate::state::AppState;

/// Body returned when the email is already registered.
pub const USER_EXISTS_MESSAGE: &str = "User Already Exist!";

/// Outcome of `POST /users`.
///
/// A duplicate email is reported as a 200 with a plain-text notice, not as
/// a 409; clients check the body text.
#[derive(Debug)]
pub enum CreateUserResponse {
    Created(InsertAck),
    AlreadyExists,
}

impl IntoResponse for CreateUserResponse {
    fn into_response(self) -> Response {
        match self {
            CreateUserResponse::Created(ack) => Json(ack).into_response(),
            CreateUserResponse::AlreadyExists => USER_EXISTS_MESSAGE.into_response(),
        }
    }
}

/// GET /users?email=
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> ApiResult<Json<Vec<Value>>> {
    let query = list_query(Collection::Users, query.value(), None);
    common::list(&state, Collection::Users, query).await
}

/// POST /users
///
/// Inserts the user unless a document with the same `email` exists.
pub async fn create_user(
    State(state): State<AppState>,
    Extension(identity): Extension<VerifiedIdentity>,
    Json(body): Json<Value>,
) -> ApiResult<CreateUserResponse> {
    let user = json_to_document(body)?;
    let email = user.get("email").cloned().unwrap_or(Bson::Null);

    if state
        .store
        .find_one(Collection::Users, doc! { "email": email.clone() })
        .await?
        .is_some()
    {
        info!(email = %email, uid = %identity.uid, "User already exists");
        return Ok(CreateUserResponse::AlreadyExists);
    }

    let ack = state.store.insert_one(Collection::Users, user).await?;
    info!(email = %email, "Created user");
    Ok(CreateUserResponse::Created(ack))
}
