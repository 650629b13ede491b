// file: src/extractor/html.rs
// description: html body text and head metadata extraction
// reference: https://docs.rs/regex

use crate::error::Result;
use crate::extractor::ContentParser;
use crate::extractor::metadata::{self, Metadata};
use crate::extractor::patterns::{
    HTML_ATTRIBUTE, HTML_BLOCK_TAG, HTML_COMMENT, HTML_ENTITY, HTML_HEAD, HTML_META,
    HTML_SCRIPT_STYLE, HTML_TAG, HTML_TITLE,
};
use std::borrow::Cow;

pub struct HtmlParser;

impl HtmlParser {
    pub fn new() -> Self {
        Self
    }

    fn read_head(&self, html: &str, metadata: &mut Metadata) {
        if let Some(caps) = HTML_TITLE.captures(html) {
            let title = collapse_whitespace(&decode_entities(&caps[1]));
            if !title.is_empty() {
                metadata.set(metadata::TITLE, title);
            }
        }

        for tag in HTML_META.find_iter(html) {
            let mut name = None;
            let mut content = None;

            for attr in HTML_ATTRIBUTE.captures_iter(tag.as_str()) {
                let value = attr
                    .get(2)
                    .or_else(|| attr.get(3))
                    .map(|m| m.as_str())
                    .unwrap_or_default();
                match attr[1].to_ascii_lowercase().as_str() {
                    "name" | "property" => name = Some(value.to_string()),
                    "content" => content = Some(decode_entities(value).into_owned()),
                    "charset" => metadata.set(metadata::CONTENT_ENCODING, value.to_uppercase()),
                    _ => {}
                }
            }

            if let (Some(name), Some(content)) = (name, content) {
                let key = match name.to_ascii_lowercase().as_str() {
                    "author" => {
                        metadata.set_if_absent(metadata::CREATOR, content.clone());
                        metadata::AUTHOR.to_string()
                    }
                    "description" => metadata::DESCRIPTION.to_string(),
                    "keywords" => metadata::KEYWORDS.to_string(),
                    "generator" => metadata::CREATOR_TOOL.to_string(),
                    _ => name,
                };
                metadata.set_if_absent(&key, content);
            }
        }
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentParser for HtmlParser {
    fn supported_types(&self) -> &[&str] {
        &["text/html", "application/xhtml+xml"]
    }

    fn parse(&self, bytes: &[u8], metadata: &mut Metadata) -> Result<String> {
        let html = String::from_utf8_lossy(bytes);

        self.read_head(&html, metadata);

        let body = HTML_HEAD.replace_all(&html, "");
        let body = HTML_COMMENT.replace_all(&body, "");
        let body = HTML_SCRIPT_STYLE.replace_all(&body, "");
        let body = HTML_BLOCK_TAG.replace_all(&body, "\n");
        let body = HTML_TAG.replace_all(&body, "");
        let body = decode_entities(&body);

        let lines: Vec<String> = body
            .lines()
            .map(collapse_whitespace)
            .filter(|line| !line.is_empty())
            .collect();

        Ok(lines.join("\n"))
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn decode_entities(text: &str) -> Cow<'_, str> {
    HTML_ENTITY.replace_all(text, |caps: &regex::Captures| {
        let entity = &caps[1];
        let decoded = if let Some(hex) = entity
            .strip_prefix("#x")
            .or_else(|| entity.strip_prefix("#X"))
        {
            u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
        } else if let Some(dec) = entity.strip_prefix('#') {
            dec.parse::<u32>().ok().and_then(char::from_u32)
        } else {
            match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some(' '),
                "copy" => Some('©'),
                "reg" => Some('®'),
                "mdash" => Some('—'),
                "ndash" => Some('–'),
                "hellip" => Some('…'),
                _ => None,
            }
        };

        decoded
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    })
}
