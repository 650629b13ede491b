// file: src/extractor/markdown.rs
// description: markdown parser mapping front matter onto document metadata
// reference: https://docs.rs/pulldown-cmark

use crate::error::{IngestError, Result};
use crate::extractor::ContentParser;
use crate::extractor::detect::UTF8_BOM;
use crate::extractor::metadata::{self, Metadata};
use crate::parser::{FrontmatterParser, MarkdownParser};

pub struct MarkdownExtractor {
    frontmatter: FrontmatterParser,
    markdown: MarkdownParser,
}

impl MarkdownExtractor {
    pub fn new() -> Self {
        Self {
            frontmatter: FrontmatterParser::new(),
            markdown: MarkdownParser::new(),
        }
    }
}

impl Default for MarkdownExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn metadata_name(key: &str) -> String {
    match key.to_ascii_lowercase().as_str() {
        "author" | "authors" => metadata::AUTHOR.to_string(),
        "title" => metadata::TITLE.to_string(),
        "description" | "summary" => metadata::DESCRIPTION.to_string(),
        "subject" => metadata::SUBJECT.to_string(),
        "keywords" | "tags" => metadata::KEYWORDS.to_string(),
        "date" | "created" => metadata::CREATED.to_string(),
        "updated" | "modified" | "lastmod" => metadata::MODIFIED.to_string(),
        _ => key.to_string(),
    }
}

impl ContentParser for MarkdownExtractor {
    fn supported_types(&self) -> &[&str] {
        &["text/markdown", "text/x-markdown"]
    }

    fn parse(&self, bytes: &[u8], metadata: &mut Metadata) -> Result<String> {
        let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        let content = std::str::from_utf8(body).map_err(|e| {
            IngestError::extraction(
                metadata.resource_label(),
                format!("content is not valid UTF-8: {}", e),
            )
        })?;

        let markdown_body = match self.frontmatter.extract(content) {
            Ok(Some((frontmatter, rest))) => {
                for (key, value) in &frontmatter.fields {
                    let name = metadata_name(key);
                    if name == metadata::AUTHOR {
                        metadata.set_if_absent(metadata::CREATOR, value.clone());
                    }
                    metadata.set_if_absent(&name, value.clone());
                }
                rest
            }
            Ok(None) => content,
            Err(e) => {
                return Err(IngestError::extraction(
                    metadata.resource_label(),
                    e.to_string(),
                ));
            }
        };

        let parsed = self.markdown.parse(markdown_body);
        if let Some(title) = parsed.first_title() {
            metadata.set_if_absent(metadata::TITLE, title);
        }

        metadata.set(metadata::CONTENT_ENCODING, "UTF-8");
        Ok(parsed.plain_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_front_matter_author_becomes_metadata() {
        let mut metadata = Metadata::new();
        let text = MarkdownExtractor::new()
            .parse(
                b"---\nauthor: Ada Lovelace\ntitle: Notes\n---\n# Engine\n\nIt computes.",
                &mut metadata,
            )
            .unwrap();

        assert_eq!(metadata.get(metadata::AUTHOR), Some("Ada Lovelace"));
        assert_eq!(metadata.get(metadata::CREATOR), Some("Ada Lovelace"));
        assert_eq!(metadata.get(metadata::TITLE), Some("Notes"));
        assert_eq!(text, "Engine\nIt computes.");
    }

    #[test]
    fn test_heading_used_as_title_fallback() {
        let mut metadata = Metadata::new();
        MarkdownExtractor::new()
            .parse(b"# Release Plan\n\nShip it.", &mut metadata)
            .unwrap();

        assert_eq!(metadata.get(metadata::TITLE), Some("Release Plan"));
        assert!(metadata.get(metadata::AUTHOR).is_none());
    }

    #[test]
    fn test_broken_front_matter_fails() {
        let mut metadata = Metadata::new();
        metadata.set(metadata::RESOURCE_NAME, "bad.md");
        let result =
            MarkdownExtractor::new().parse(b"---\ntags: [unclosed\n---\nbody", &mut metadata);
        assert!(result.is_err());
    }
}
