//! Model error types.

use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Invalid document id: {0}")]
    InvalidDocId(String),

    #[error("Request body must be a JSON object")]
    NotAnObject,

    #[error("You cannot accept your own posted job.")]
    SelfAcceptance,
}
