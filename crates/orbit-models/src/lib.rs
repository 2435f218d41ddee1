//! Shared wire types for the Work Orbit backend.
//!
//! This crate provides:
//! - Collection names and their list filter fields
//! - Document identifier parsing
//! - Write acknowledgments in the shape clients already parse
//! - The job patch and task acceptance rules
//! - BSON/JSON conversion for request and response bodies

pub mod ack;
pub mod collection;
pub mod error;
pub mod id;
pub mod job;
pub mod json;
pub mod task;

// Re-export common types
pub use ack::{DeleteAck, InsertAck, UpdateAck};
pub use collection::Collection;
pub use error::{ModelError, ModelResult};
pub use id::DocId;
pub use job::JobPatch;
pub use json::{bson_to_json, document_to_json, json_to_bson, json_to_document};
pub use task::{ensure_not_self_acceptance, SELF_ACCEPTANCE_MESSAGE};

pub use bson::{doc, Bson, Document};
