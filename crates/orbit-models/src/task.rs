//! Task acceptance rule.

use bson::Document;

use crate::error::ModelError;

/// Message returned when a worker tries to accept their own job.
pub const SELF_ACCEPTANCE_MESSAGE: &str = "You cannot accept your own posted job.";

/// Reject a task whose worker is also the client.
///
/// Two missing emails count as equal.
pub fn ensure_not_self_acceptance(task: &Document) -> Result<(), ModelError> {
    if task.get("workerEmail") == task.get("clientEmail") {
        return Err(ModelError::SelfAcceptance);
    }
    Ok(())
}
