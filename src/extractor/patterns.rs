// file: src/extractor/patterns.rs
// description: compiled regex patterns for html text and metadata extraction
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    pub static ref HTML_TITLE: Regex = Regex::new(
        r"(?is)<title[^>]*>(.*?)</title\s*>"
    ).expect("HTML_TITLE regex is valid");

    pub static ref HTML_META: Regex = Regex::new(
        r"(?is)<meta\b[^>]*>"
    ).expect("HTML_META regex is valid");

    pub static ref HTML_ATTRIBUTE: Regex = Regex::new(
        r#"(?is)([a-z:-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#
    ).expect("HTML_ATTRIBUTE regex is valid");

    pub static ref HTML_HEAD: Regex = Regex::new(
        r"(?is)<head\b.*?</head\s*>"
    ).expect("HTML_HEAD regex is valid");

    pub static ref HTML_SCRIPT_STYLE: Regex = Regex::new(
        r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>|<noscript\b.*?</noscript\s*>"
    ).expect("HTML_SCRIPT_STYLE regex is valid");

    pub static ref HTML_COMMENT: Regex = Regex::new(
        r"(?s)<!--.*?-->"
    ).expect("HTML_COMMENT regex is valid");

    pub static ref HTML_BLOCK_TAG: Regex = Regex::new(
        r"(?i)</?(?:p|div|br|li|tr|td|th|h[1-6]|section|article|header|footer|table|ul|ol|blockquote|pre)\b[^>]*>"
    ).expect("HTML_BLOCK_TAG regex is valid");

    pub static ref HTML_TAG: Regex = Regex::new(
        r"(?s)<[^>]*>"
    ).expect("HTML_TAG regex is valid");

    pub static ref HTML_ENTITY: Regex = Regex::new(
        r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]{2,8});"
    ).expect("HTML_ENTITY regex is valid");

    pub static ref PDF_DATE: Regex = Regex::new(
        r"^D?:?(\d{4})(\d{2})?(\d{2})?(\d{2})?(\d{2})?(\d{2})?(Z|[+-]\d{2}'?\d{2}'?)?"
    ).expect("PDF_DATE regex is valid");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_pattern() {
        let caps = HTML_TITLE.captures("<TITLE>Quarterly</title>").unwrap();
        assert_eq!(&caps[1], "Quarterly");
    }

    #[test]
    fn test_attribute_pattern() {
        let attrs: Vec<(String, String)> = HTML_ATTRIBUTE
            .captures_iter(r#"<meta name="author" content='Grace Hopper'>"#)
            .map(|c| {
                let value = c.get(2).or_else(|| c.get(3)).unwrap().as_str();
                (c[1].to_string(), value.to_string())
            })
            .collect();
        assert_eq!(
            attrs,
            vec![
                ("name".to_string(), "author".to_string()),
                ("content".to_string(), "Grace Hopper".to_string()),
            ]
        );
    }

    #[test]
    fn test_pdf_date_pattern() {
        let caps = PDF_DATE.captures("D:20240131083000Z").unwrap();
        assert_eq!(&caps[1], "2024");
        assert_eq!(&caps[2], "01");
        assert_eq!(&caps[7], "Z");
    }
}
