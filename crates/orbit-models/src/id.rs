//! Document identifiers.

use std::fmt;
use std::str::FromStr;

use bson::oid::ObjectId;

use crate::error::ModelError;

/// Store-native document identifier (a MongoDB ObjectId).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocId(ObjectId);

impl DocId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    /// Parse a path segment into an identifier.
    ///
    /// Only 24-character hex strings are accepted.
    pub fn parse(s: &str) -> Result<Self, ModelError> {
        ObjectId::parse_str(s)
            .map(Self)
            .map_err(|_| ModelError::InvalidDocId(s.to_string()))
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl Default for DocId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ObjectId> for DocId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl FromStr for DocId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}
