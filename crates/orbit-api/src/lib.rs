//! Axum HTTP API server.
//!
//! This crate provides:
//! - CRUD routes over the users, jobs, featured jobs, tasks and added jobs collections
//! - Firebase ID token verification on every mutating route
//! - Security headers, request ids and request logging
//! - Prometheus metrics

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use auth::{FirebaseVerifier, TokenVerifier, VerifiedIdentity};
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
