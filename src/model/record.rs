use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use super::field::FieldValue;

/// A contact-style record: a name plus named multi-item fields
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub name: String,
    /// Last time any field was persisted
    pub updated: Option<DateTime<Utc>>,
    /// Fields in file order
    pub fields: IndexMap<String, FieldValue>,
}

impl Record {
    pub fn new(name: String) -> Self {
        Record {
            name,
            updated: None,
            fields: IndexMap::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields.keys().cloned().collect()
    }
}
