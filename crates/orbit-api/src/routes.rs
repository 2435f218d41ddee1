//! API routes.

use axum::middleware;
use axum::routing::{delete, get, patch, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::{
    accept_task, create_added_job, create_featured_job, create_job, create_user,
    delete_added_job, delete_job, delete_task, get_added_job, get_featured_job, get_job, health,
    list_added_jobs, list_featured_jobs, list_jobs, list_tasks, list_users, ready, root,
    update_added_job, update_job,
};
use crate::metrics::metrics_middleware;
use crate::middleware::{cors_layer, request_id, request_logging, require_auth, security_headers};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    // Reads are open to anyone
    let public_routes = Router::new()
        .route("/users", get(list_users))
        .route("/allJobs", get(list_jobs))
        .route("/allJobs/:id", get(get_job))
        .route("/someJobs", get(list_featured_jobs))
        .route("/someJobs/:id", get(get_featured_job))
        .route("/myTasks", get(list_tasks))
        .route("/myAddedJobs", get(list_added_jobs))
        .route("/myAddedJobs/:id", get(get_added_job));

    // Writes require a verified Firebase ID token
    let protected_routes = Router::new()
        .route("/users", post(create_user))
        .route("/allJobs", post(create_job))
        .route("/allJobs/:id", patch(update_job))
        .route("/allJobs/:id", delete(delete_job))
        .route("/someJobs", post(create_featured_job))
        .route("/myTasks", post(accept_task))
        .route("/myTasks/:id", delete(delete_task))
        .route("/myAddedJobs", post(create_added_job))
        .route("/myAddedJobs/:id", patch(update_added_job))
        .route("/myAddedJobs/:id", delete(delete_added_job))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let health_routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    // Metrics endpoint (if enabled)
    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
