// file: src/models/document.rs
// description: generic field-name-to-value record submitted to the search index
// reference: internal data structures

use serde::Serialize;
use std::collections::BTreeMap;

pub const ID_FIELD: &str = "id";

/// A flat index document. The `id` field is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Document {
    fields: BTreeMap<String, String>,
}

impl Document {
    pub fn new(id: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(ID_FIELD.to_string(), id.into());
        Self { fields }
    }

    /// Replaces any previous value for `name`.
    pub fn add_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_field(name, value);
        self
    }

    /// Adds the field only when a value is present; absent values leave no key behind.
    pub fn add_optional_field(&mut self, name: impl Into<String>, value: Option<impl Into<String>>) {
        if let Some(value) = value {
            self.add_field(name, value);
        }
    }

    pub fn id(&self) -> &str {
        self.fields
            .get(ID_FIELD)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
