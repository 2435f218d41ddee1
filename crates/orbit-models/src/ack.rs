//! Write acknowledgments.
//!
//! Field names follow the MongoDB driver result objects (`insertedId`,
//! `matchedCount`, ...) so existing clients keep parsing them unchanged.

use bson::Bson;
use serde::{Deserialize, Serialize};

use crate::id::DocId;
use crate::json::bson_to_json;

/// Result of a single-document insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    pub inserted_id: serde_json::Value,
}

impl InsertAck {
    pub fn new(inserted_id: &Bson) -> Self {
        Self {
            acknowledged: true,
            inserted_id: bson_to_json(inserted_id),
        }
    }

    /// Inserted id as a native identifier, when the store generated one.
    pub fn doc_id(&self) -> Option<DocId> {
        self.inserted_id.as_str().and_then(|s| DocId::parse(s).ok())
    }
}

/// Result of a single-document partial update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<serde_json::Value>,
    pub upserted_count: u64,
}

impl UpdateAck {
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
            upserted_id: None,
            upserted_count: 0,
        }
    }
}

/// Result of a single-document delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteAck {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}
