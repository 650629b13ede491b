// file: src/extractor/registry.rs
// description: format auto-detecting extractor dispatching to registered parsers
// reference: internal extraction pipeline

use crate::error::{IngestError, Result};
use crate::extractor::metadata::{self, Metadata};
use crate::extractor::{
    ContentParser, ExtractedContent, HtmlParser, ImageParser, MarkdownExtractor, PdfParser, TextParser,
    detect,
};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

const TEXT_PARSER: &str = "text";

/// Detects the media type of each input and routes it to the parser
/// registered for that type.
pub struct AutoDetectExtractor {
    parsers: HashMap<String, Arc<dyn ContentParser>>,
    mime_mapping: HashMap<String, String>,
}

impl AutoDetectExtractor {
    /// An extractor with no parsers; every input fails as unsupported.
    pub fn empty() -> Self {
        Self {
            parsers: HashMap::new(),
            mime_mapping: HashMap::new(),
        }
    }

    pub fn new() -> Self {
        let mut extractor = Self::empty();
        extractor.register(TEXT_PARSER, TextParser::new());
        extractor.register("markdown", MarkdownExtractor::new());
        extractor.register("html", HtmlParser::new());
        extractor.register("pdf", PdfParser::new());
        extractor.register("image", ImageParser::new());
        extractor
    }

    pub fn register<P: ContentParser + 'static>(&mut self, name: &str, parser: P) {
        let parser = Arc::new(parser);
        for mime in parser.supported_types() {
            self.mime_mapping
                .insert((*mime).to_string(), name.to_string());
        }
        self.parsers.insert(name.to_string(), parser);
    }

    /// Exact match first; any other `text/*` type falls back to the text parser.
    pub fn parser_for(&self, media_type: &str) -> Option<Arc<dyn ContentParser>> {
        if let Some(parser) = self
            .mime_mapping
            .get(media_type)
            .and_then(|name| self.parsers.get(name))
        {
            return Some(parser.clone());
        }

        if media_type.starts_with("text/") {
            return self.parsers.get(TEXT_PARSER).cloned();
        }

        None
    }

    pub fn extract<R: Read>(
        &self,
        mut input: R,
        resource_name: Option<&str>,
    ) -> Result<ExtractedContent> {
        let label = resource_name.unwrap_or("<stream>");
        let mut bytes = Vec::new();
        input
            .read_to_end(&mut bytes)
            .map_err(|e| IngestError::extraction(label, format!("read failed: {}", e)))?;

        let media_type = detect::detect(&bytes, resource_name);
        debug!("Detected {} for {}", media_type, label);

        let mut metadata = Metadata::new();
        if let Some(name) = resource_name {
            metadata.set(metadata::RESOURCE_NAME, name);
        }
        metadata.set(metadata::CONTENT_TYPE, media_type.clone());
        metadata.set(metadata::CONTENT_LENGTH, bytes.len().to_string());

        let parser = self
            .parser_for(&media_type)
            .ok_or_else(|| IngestError::UnsupportedType(format!("{} ({})", media_type, label)))?;

        let text = parser.parse(&bytes, &mut metadata)?;

        Ok(ExtractedContent { text, metadata })
    }

    pub fn extract_file(&self, path: &Path) -> Result<ExtractedContent> {
        let file = File::open(path).map_err(|e| IngestError::file_operation(path, e))?;
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
        self.extract(file, name.as_deref())
    }
}

impl Default for AutoDetectExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_empty_extractor_rejects_everything() {
        let extractor = AutoDetectExtractor::empty();
        let result = extractor.extract(&b"hello"[..], Some("a.txt"));
        assert!(matches!(result, Err(IngestError::UnsupportedType(_))));
    }

    #[test]
    fn test_text_fallback_for_unlisted_text_type() {
        let extractor = AutoDetectExtractor::new();
        assert!(extractor.parser_for("text/x-haskell").is_some());
        assert!(extractor.parser_for("video/mp4").is_none());
    }

    #[test]
    fn test_extract_sets_base_metadata() {
        let extractor = AutoDetectExtractor::new();
        let content = extractor
            .extract(&b"Hello, world!"[..], Some("greeting.txt"))
            .unwrap();

        assert_eq!(content.text, "Hello, world!");
        assert_eq!(content.metadata.get(metadata::RESOURCE_NAME), Some("greeting.txt"));
        assert_eq!(content.metadata.get(metadata::CONTENT_TYPE), Some("text/plain"));
        assert_eq!(content.metadata.get(metadata::CONTENT_LENGTH), Some("13"));
        assert!(content.author().is_none());
    }

    #[test]
    fn test_extract_file_markdown_author() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("notes.md");
        fs::write(&path, "---\nauthor: Linus\n---\n# Kernel\n\nNotes.").unwrap();

        let content = AutoDetectExtractor::new().extract_file(&path).unwrap();

        assert_eq!(content.author(), Some("Linus"));
        assert_eq!(content.text, "Kernel\nNotes.");
    }

    #[test]
    fn test_binary_is_unsupported() {
        let extractor = AutoDetectExtractor::new();
        let result = extractor.extract(&[0x7F, b'E', b'L', b'F', 0, 0][..], Some("tool"));
        assert!(matches!(result, Err(IngestError::UnsupportedType(_))));
    }

    #[test]
    fn test_image_yields_dimensions() {
        let mut png = std::io::Cursor::new(Vec::new());
        ::image::RgbImage::new(1, 1)
            .write_to(&mut png, ::image::ImageFormat::Png)
            .unwrap();

        let content = AutoDetectExtractor::new()
            .extract(&png.into_inner()[..], Some("photo.png"))
            .unwrap();

        assert_eq!(content.text, "");
        assert_eq!(content.metadata.get(metadata::CONTENT_TYPE), Some("image/png"));
        assert_eq!(content.metadata.get(metadata::IMAGE_WIDTH), Some("1"));
        assert_eq!(content.metadata.get(metadata::IMAGE_LENGTH), Some("1"));
    }

    #[test]
    fn test_archive_is_unsupported() {
        let result = AutoDetectExtractor::new().extract(&b"PK\x03\x04\x00\x00"[..], Some("a.zip"));
        assert!(matches!(result, Err(IngestError::UnsupportedType(_))));
    }

    #[test]
    fn test_missing_file_is_file_error() {
        let result = AutoDetectExtractor::new().extract_file(Path::new("/nonexistent/file.txt"));
        assert!(matches!(result, Err(IngestError::FileOperation { .. })));
    }
}
