// file: src/extractor/detect.rs
// description: media type detection from magic bytes and resource names
// reference: https://docs.rs/mime_guess

use std::path::Path;

pub const OCTET_STREAM: &str = "application/octet-stream";

const SNIFF_LEN: usize = 8 * 1024;
pub(crate) const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

const MAGIC: &[(&[u8], &str)] = &[
    (b"%PDF-", "application/pdf"),
    (b"\x89PNG\r\n\x1a\n", "image/png"),
    (b"\xFF\xD8\xFF", "image/jpeg"),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"II*\x00", "image/tiff"),
    (b"MM\x00*", "image/tiff"),
    (b"PK\x03\x04", "application/zip"),
    (b"\x1F\x8B", "application/gzip"),
    (b"\x7FELF", "application/x-executable"),
];

/// Content wins over the name: magic bytes first, then the file name, then a
/// text/binary sniff of the leading bytes.
pub fn detect(bytes: &[u8], resource_name: Option<&str>) -> String {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    for (magic, media_type) in MAGIC {
        if body.starts_with(magic) {
            return (*media_type).to_string();
        }
    }

    if looks_like_html(body) {
        return "text/html".to_string();
    }

    if let Some(media_type) = resource_name.and_then(guess_from_name) {
        return media_type;
    }

    if looks_like_text(body) {
        "text/plain".to_string()
    } else {
        OCTET_STREAM.to_string()
    }
}

fn guess_from_name(name: &str) -> Option<String> {
    let path = Path::new(name);
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();

    // mime_guess has no stable answer for markdown across versions
    if matches!(extension.as_str(), "md" | "markdown" | "mdown" | "mkd") {
        return Some("text/markdown".to_string());
    }

    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string())
}

fn looks_like_html(body: &[u8]) -> bool {
    let head = &body[..body.len().min(512)];
    let head = String::from_utf8_lossy(head);
    let trimmed = head.trim_start().to_ascii_lowercase();
    trimmed.starts_with("<!doctype html") || trimmed.starts_with("<html")
}

fn looks_like_text(body: &[u8]) -> bool {
    let sample = &body[..body.len().min(SNIFF_LEN)];
    if sample.contains(&0) {
        return false;
    }
    match std::str::from_utf8(sample) {
        Ok(_) => true,
        // a multi-byte char cut by the sample window is still text
        Err(e) => e.error_len().is_none(),
    }
}
