// file: src/extractor/mod.rs
// description: content extraction module exports and parser trait
// reference: internal module structure

pub mod detect;
pub mod html;
pub mod image;
pub mod markdown;
pub mod metadata;
pub mod patterns;
pub mod pdf;
pub mod registry;
pub mod text;

pub use html::HtmlParser;
pub use self::image::ImageParser;
pub use markdown::MarkdownExtractor;
pub use metadata::Metadata;
pub use pdf::PdfParser;
pub use registry::AutoDetectExtractor;
pub use text::TextParser;

use crate::error::Result;

/// A format-specific parser. Implementations receive the whole input and may
/// add entries to `metadata` before returning the body text.
pub trait ContentParser: Send + Sync {
    fn supported_types(&self) -> &[&str];

    fn parse(&self, bytes: &[u8], metadata: &mut Metadata) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct ExtractedContent {
    pub text: String,
    pub metadata: Metadata,
}

impl ExtractedContent {
    pub fn author(&self) -> Option<&str> {
        self.metadata.get(metadata::AUTHOR)
    }
}
