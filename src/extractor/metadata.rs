// file: src/extractor/metadata.rs
// description: name-to-value metadata produced alongside extracted text
// reference: Dublin Core / XMP property names

use serde::Serialize;
use std::collections::BTreeMap;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_LENGTH: &str = "Content-Length";
pub const CONTENT_ENCODING: &str = "Content-Encoding";
pub const RESOURCE_NAME: &str = "resourceName";
pub const AUTHOR: &str = "Author";
pub const CREATOR: &str = "dc:creator";
pub const TITLE: &str = "dc:title";
pub const SUBJECT: &str = "dc:subject";
pub const DESCRIPTION: &str = "dc:description";
pub const KEYWORDS: &str = "meta:keyword";
pub const CREATED: &str = "dcterms:created";
pub const MODIFIED: &str = "dcterms:modified";
pub const CREATOR_TOOL: &str = "xmp:CreatorTool";
pub const PRODUCER: &str = "pdf:Producer";
pub const PAGE_COUNT: &str = "xmpTPg:NPages";
pub const IMAGE_WIDTH: &str = "tiff:ImageWidth";
pub const IMAGE_LENGTH: &str = "tiff:ImageLength";
pub const IMAGE_FORMAT: &str = "image:Format";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Metadata {
    values: BTreeMap<String, String>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Keeps the first value written under `name`.
    pub fn set_if_absent(&mut self, name: &str, value: impl Into<String>) {
        if !self.values.contains_key(name) {
            self.values.insert(name.to_string(), value.into());
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Label used in diagnostics when a parser fails.
    pub fn resource_label(&self) -> &str {
        self.get(RESOURCE_NAME).unwrap_or("<stream>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_if_absent_keeps_first() {
        let mut metadata = Metadata::new();
        metadata.set_if_absent(TITLE, "From front matter");
        metadata.set_if_absent(TITLE, "From heading");
        assert_eq!(metadata.get(TITLE), Some("From front matter"));
    }

    #[test]
    fn test_names_are_sorted() {
        let mut metadata = Metadata::new();
        metadata.set(RESOURCE_NAME, "a.txt");
        metadata.set(AUTHOR, "Ada");
        let names: Vec<&str> = metadata.names().collect();
        assert_eq!(names, vec![AUTHOR, RESOURCE_NAME]);
        assert_eq!(metadata.resource_label(), "a.txt");
    }
}
