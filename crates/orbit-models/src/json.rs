//! BSON/JSON conversion.
//!
//! Responses render ObjectIds as plain hex strings and datetimes as RFC 3339
//! strings, the way a JSON-serialized driver document looks to browsers.

use bson::{Bson, Document};
use serde_json::{Map, Number, Value};

use crate::error::{ModelError, ModelResult};

/// Render a BSON value as JSON.
pub fn bson_to_json(value: &Bson) -> Value {
    match value {
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Boolean(b) => Value::Bool(*b),
        Bson::Int32(i) => Value::Number((*i).into()),
        Bson::Int64(i) => Value::Number((*i).into()),
        Bson::Double(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
        Bson::String(s) => Value::String(s.clone()),
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => match dt.try_to_rfc3339_string() {
            Ok(s) => Value::String(s),
            Err(_) => Value::Number(dt.timestamp_millis().into()),
        },
        Bson::Array(items) => Value::Array(items.iter().map(bson_to_json).collect()),
        Bson::Document(doc) => document_to_json(doc),
        other => other.clone().into_relaxed_extjson(),
    }
}

/// Render a whole document as a JSON object.
pub fn document_to_json(doc: &Document) -> Value {
    let map: Map<String, Value> = doc
        .iter()
        .map(|(k, v)| (k.clone(), bson_to_json(v)))
        .collect();
    Value::Object(map)
}

/// Convert a JSON value to BSON.
///
/// Integers that fit `i64` become `Int64`; larger unsigned integers become
/// `Double`, as the JavaScript driver stores them.
pub fn json_to_bson(value: Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(b),
        Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => Bson::Int64(i),
            (None, Some(u)) => Bson::Double(u as f64),
            (None, None) => n.as_f64().map(Bson::Double).unwrap_or(Bson::Null),
        },
        Value::String(s) => Bson::String(s),
        Value::Array(items) => Bson::Array(items.into_iter().map(json_to_bson).collect()),
        Value::Object(map) => Bson::Document(object_to_document(map)),
    }
}

fn object_to_document(map: Map<String, Value>) -> Document {
    map.into_iter().map(|(k, v)| (k, json_to_bson(v))).collect()
}

/// Convert a request body into a BSON document, verbatim.
pub fn json_to_document(value: Value) -> ModelResult<Document> {
    match value {
        Value::Object(map) => Ok(object_to_document(map)),
        _ => Err(ModelError::NotAnObject),
    }
}
