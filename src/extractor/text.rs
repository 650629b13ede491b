// file: src/extractor/text.rs
// description: plain text and source file parser
// reference: UTF-8 decoding

use crate::error::{IngestError, Result};
use crate::extractor::ContentParser;
use crate::extractor::detect::UTF8_BOM;
use crate::extractor::metadata::{self, Metadata};

pub struct TextParser;

impl TextParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentParser for TextParser {
    fn supported_types(&self) -> &[&str] {
        &[
            "text/plain",
            "text/csv",
            "text/tab-separated-values",
            "text/xml",
            "text/css",
            "text/javascript",
            "text/x-rust",
            "text/x-python",
            "text/x-java",
            "text/x-c",
            "text/x-c++",
            "text/x-go",
            "text/x-sql",
            "application/json",
            "application/xml",
            "application/javascript",
            "application/toml",
            "application/x-yaml",
            "application/yaml",
            "application/x-sh",
            "application/sql",
        ]
    }

    fn parse(&self, bytes: &[u8], metadata: &mut Metadata) -> Result<String> {
        let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

        let text = std::str::from_utf8(body).map_err(|e| {
            IngestError::extraction(
                metadata.resource_label(),
                format!("content is not valid UTF-8: {}", e),
            )
        })?;

        metadata.set(metadata::CONTENT_ENCODING, "UTF-8");
        Ok(text.to_string())
    }
}
