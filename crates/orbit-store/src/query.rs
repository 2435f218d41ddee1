//! List query description.

use mongodb::bson::Document;

/// Sort on a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub descending: bool,
}

impl SortSpec {
    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }

    pub fn to_document(&self) -> Document {
        let direction: i32 = if self.descending { -1 } else { 1 };
        let mut sort = Document::new();
        sort.insert(self.field.as_str(), direction);
        sort
    }
}

/// A `find` over one collection: optional equality filter, sort and limit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindQuery {
    pub filter: Option<(String, String)>,
    pub sort: Option<SortSpec>,
    pub limit: Option<i64>,
}

impl FindQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_equals(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filter = Some((field.into(), value.into()));
        self
    }

    pub fn sorted(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn limited(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn filter_document(&self) -> Document {
        let mut filter = Document::new();
        if let Some((field, value)) = &self.filter {
            filter.insert(field.as_str(), value.as_str());
        }
        filter
    }
}
