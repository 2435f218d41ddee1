//! Job edit payload.

use bson::{Bson, Document};
use serde::{Deserialize, Serialize};

use crate::json::json_to_bson;

/// The editable subset of a job listing.
///
/// Any other keys in the request body are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPatch {
    #[serde(default)]
    pub title: Option<serde_json::Value>,
    #[serde(default)]
    pub category: Option<serde_json::Value>,
    #[serde(default)]
    pub summary: Option<serde_json::Value>,
    #[serde(default)]
    pub cover_image: Option<serde_json::Value>,
}

impl JobPatch {
    pub const FIELDS: [&'static str; 4] = ["title", "category", "summary", "coverImage"];

    /// Build the `$set` body: always exactly the four editable fields.
    ///
    /// Omitted fields are written as null.
    pub fn to_set_document(&self) -> Document {
        let values = [&self.title, &self.category, &self.summary, &self.cover_image];
        let mut set = Document::new();
        for (field, value) in Self::FIELDS.iter().zip(values) {
            let bson = match value {
                Some(v) => json_to_bson(v.clone()),
                None => Bson::Null,
            };
            set.insert(*field, bson);
        }
        set
    }
}
