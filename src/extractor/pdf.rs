// file: src/extractor/pdf.rs
// description: pdf text extraction and document information dictionary
// reference: https://docs.rs/pdf-extract, https://docs.rs/lopdf

use crate::error::{IngestError, Result};
use crate::extractor::ContentParser;
use crate::extractor::metadata::{self, Metadata};
use crate::extractor::patterns::PDF_DATE;
use lopdf::{Dictionary, Document, Object};
use std::panic::{self, AssertUnwindSafe};
use tracing::debug;

pub struct PdfParser;

impl PdfParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentParser for PdfParser {
    fn supported_types(&self) -> &[&str] {
        &["application/pdf"]
    }

    fn parse(&self, bytes: &[u8], metadata: &mut Metadata) -> Result<String> {
        let resource = metadata.resource_label().to_string();

        let document = Document::load_mem(bytes)
            .map_err(|e| IngestError::extraction(&resource, format!("invalid PDF: {}", e)))?;

        if document.is_encrypted() {
            return Err(IngestError::extraction(&resource, "PDF is encrypted"));
        }

        metadata.set(metadata::PAGE_COUNT, document.get_pages().len().to_string());
        if let Some(info) = info_dictionary(&document) {
            read_info(info, metadata);
        }

        // pdf-extract panics on some malformed content streams
        let text = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(bytes)
        }))
        .map_err(|_| IngestError::extraction(&resource, "PDF text extraction panicked"))?
        .map_err(|e| {
            IngestError::extraction(&resource, format!("PDF text extraction failed: {}", e))
        })?;

        debug!("Extracted {} chars of PDF text from {}", text.len(), resource);
        Ok(text)
    }
}

fn info_dictionary(document: &Document) -> Option<&Dictionary> {
    match document.trailer.get(b"Info").ok()? {
        Object::Reference(id) => document.get_object(*id).ok()?.as_dict().ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

fn read_info(info: &Dictionary, metadata: &mut Metadata) {
    for (key, value) in info.iter() {
        let Object::String(raw, _) = value else {
            continue;
        };
        let text = decode_text_string(raw);
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        match key.as_slice() {
            b"Author" => {
                metadata.set(metadata::AUTHOR, text);
                metadata.set(metadata::CREATOR, text);
            }
            b"Title" => metadata.set(metadata::TITLE, text),
            b"Subject" => metadata.set(metadata::SUBJECT, text),
            b"Keywords" => metadata.set(metadata::KEYWORDS, text),
            b"Creator" => metadata.set(metadata::CREATOR_TOOL, text),
            b"Producer" => metadata.set(metadata::PRODUCER, text),
            b"CreationDate" => metadata.set(metadata::CREATED, convert_pdf_date(text)),
            b"ModDate" => metadata.set(metadata::MODIFIED, convert_pdf_date(text)),
            other => metadata.set(
                format!("pdf:docinfo:custom:{}", String::from_utf8_lossy(other)),
                text,
            ),
        }
    }
}

/// PDF text strings are UTF-16BE when they carry a BOM, otherwise a
/// Latin-1 superset.
fn decode_text_string(raw: &[u8]) -> String {
    if let Some(utf16) = raw.strip_prefix(&[0xFE, 0xFF][..]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    if let Some(utf8) = raw.strip_prefix(&[0xEF, 0xBB, 0xBF][..]) {
        return String::from_utf8_lossy(utf8).into_owned();
    }
    raw.iter().map(|&b| b as char).collect()
}

/// `D:YYYYMMDDHHmmSS+HH'mm'` to ISO-8601; unparseable values are kept verbatim.
fn convert_pdf_date(raw: &str) -> String {
    let Some(caps) = PDF_DATE.captures(raw) else {
        return raw.to_string();
    };

    let part = |idx: usize, default: &'static str| -> String {
        caps.get(idx)
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| default.to_string())
    };

    let zone = match caps.get(7).map(|m| m.as_str()) {
        None | Some("Z") => "Z".to_string(),
        Some(offset) => {
            let digits: String = offset.chars().filter(|c| *c != '\'').collect();
            format!("{}:{}", &digits[..3], &digits[3..])
        }
    };

    format!(
        "{}-{}-{}T{}:{}:{}{}",
        part(1, "0000"),
        part(2, "01"),
        part(3, "01"),
        part(4, "00"),
        part(5, "00"),
        part(6, "00"),
        zone
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::StringFormat;

    #[test]
    fn test_convert_pdf_date() {
        assert_eq!(convert_pdf_date("D:20240131083000Z"), "2024-01-31T08:30:00Z");
        assert_eq!(
            convert_pdf_date("D:20240131083000+02'00'"),
            "2024-01-31T08:30:00+02:00"
        );
        assert_eq!(convert_pdf_date("D:2023"), "2023-01-01T00:00:00Z");
        assert_eq!(convert_pdf_date("yesterday"), "yesterday");
    }

    #[test]
    fn test_decode_text_string() {
        assert_eq!(decode_text_string(b"Plain"), "Plain");
        assert_eq!(decode_text_string(&[0xFE, 0xFF, 0x00, 0x41, 0x00, 0xE9]), "Aé");
        assert_eq!(decode_text_string(&[0x43, 0x61, 0x66, 0xE9]), "Café");
    }

    #[test]
    fn test_read_info_maps_author() {
        let mut info = Dictionary::new();
        info.set("Author", Object::String(b"Erin".to_vec(), StringFormat::Literal));
        info.set("Title", Object::String(b"Manual".to_vec(), StringFormat::Literal));
        info.set("Company", Object::String(b"Acme".to_vec(), StringFormat::Literal));
        info.set("Trapped", Object::Name(b"False".to_vec()));

        let mut metadata = Metadata::new();
        read_info(&info, &mut metadata);

        assert_eq!(metadata.get(metadata::AUTHOR), Some("Erin"));
        assert_eq!(metadata.get(metadata::TITLE), Some("Manual"));
        assert_eq!(metadata.get("pdf:docinfo:custom:Company"), Some("Acme"));
        assert_eq!(metadata.len(), 4);
    }

    #[test]
    fn test_garbage_pdf_fails() {
        let mut metadata = Metadata::new();
        metadata.set(metadata::RESOURCE_NAME, "broken.pdf");
        let err = PdfParser::new()
            .parse(b"%PDF-1.4\nthis is not a pdf", &mut metadata)
            .unwrap_err();
        assert!(matches!(err, IngestError::Extraction { .. }));
    }
}
