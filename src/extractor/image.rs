// file: src/extractor/image.rs
// description: raster image header reader reporting dimensions and format
// reference: https://docs.rs/image

use crate::error::{IngestError, Result};
use crate::extractor::ContentParser;
use crate::extractor::metadata::{self, Metadata};
use ::image::ImageReader;
use std::io::Cursor;
use tracing::debug;

/// Images carry no body text; only the header is decoded.
pub struct ImageParser;

impl ImageParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentParser for ImageParser {
    fn supported_types(&self) -> &[&str] {
        &[
            "image/jpeg",
            "image/png",
            "image/gif",
            "image/webp",
            "image/bmp",
            "image/tiff",
        ]
    }

    fn parse(&self, bytes: &[u8], metadata: &mut Metadata) -> Result<String> {
        let resource = metadata.resource_label().to_string();

        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| IngestError::extraction(&resource, format!("unreadable image: {}", e)))?;

        let format = reader
            .format()
            .map(|f| format!("{:?}", f).to_lowercase())
            .ok_or_else(|| IngestError::extraction(&resource, "unknown image format"))?;

        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| IngestError::extraction(&resource, format!("image decode failed: {}", e)))?;

        debug!("Read {}x{} {} image {}", width, height, format, resource);

        metadata.set(metadata::IMAGE_WIDTH, width.to_string());
        metadata.set(metadata::IMAGE_LENGTH, height.to_string());
        metadata.set(metadata::IMAGE_FORMAT, format);

        Ok(String::new())
    }
}
