// file: src/parser/markdown.rs
// description: markdown to plain text rendering with pulldown-cmark
// reference: https://docs.rs/pulldown-cmark

use pulldown_cmark::{Event, Parser, Tag, TagEnd};

pub struct MarkdownParser;

#[derive(Debug, Clone)]
pub struct ParsedMarkdown {
    pub plain_text: String,
    pub headings: Vec<Heading>,
}

#[derive(Debug, Clone)]
pub struct Heading {
    pub level: u32,
    pub text: String,
}

impl ParsedMarkdown {
    pub fn first_title(&self) -> Option<&str> {
        self.headings
            .iter()
            .find(|h| h.level == 1)
            .map(|h| h.text.as_str())
    }
}

impl MarkdownParser {
    pub fn new() -> Self {
        Self
    }

    /// Block elements end with a newline; code blocks keep their content verbatim.
    pub fn parse(&self, content: &str) -> ParsedMarkdown {
        let parser = Parser::new(content);

        let mut plain_text = String::new();
        let mut headings = Vec::new();
        let mut current_heading: Option<(u32, String)> = None;

        for event in parser {
            match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    current_heading = Some((level as u32, String::new()));
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some((level, text)) = current_heading.take() {
                        headings.push(Heading {
                            level,
                            text: text.trim().to_string(),
                        });
                    }
                    push_block_break(&mut plain_text);
                }
                Event::End(
                    TagEnd::Paragraph
                    | TagEnd::Item
                    | TagEnd::CodeBlock
                    | TagEnd::BlockQuote(_)
                    | TagEnd::TableRow
                    | TagEnd::TableHead,
                ) => {
                    push_block_break(&mut plain_text);
                }
                Event::End(TagEnd::TableCell) => {
                    plain_text.push('\t');
                }
                Event::Text(text) | Event::Code(text) => {
                    if let Some((_, ref mut heading_text)) = current_heading {
                        heading_text.push_str(&text);
                    }
                    plain_text.push_str(&text);
                }
                Event::SoftBreak | Event::HardBreak => {
                    plain_text.push('\n');
                }
                _ => {}
            }
        }

        ParsedMarkdown {
            plain_text: plain_text.trim().to_string(),
            headings,
        }
    }
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

fn push_block_break(text: &mut String) {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_parsing() {
        let parser = MarkdownParser::new();
        let parsed = parser.parse("# Title\n\nSome *content* here.");

        assert_eq!(parsed.headings.len(), 1);
        assert_eq!(parsed.first_title(), Some("Title"));
        assert_eq!(parsed.plain_text, "Title\nSome content here.");
    }

    #[test]
    fn test_code_kept_in_text() {
        let parser = MarkdownParser::new();
        let parsed = parser.parse("Run `cargo` then:\n\n```\nmake all\n```\n");

        assert!(parsed.plain_text.contains("Run cargo then:"));
        assert!(parsed.plain_text.contains("make all"));
    }

    #[test]
    fn test_links_render_as_label() {
        let parser = MarkdownParser::new();
        let parsed = parser.parse("[Example](https://example.com)");

        assert_eq!(parsed.plain_text, "Example");
        assert!(parsed.first_title().is_none());
    }
}
