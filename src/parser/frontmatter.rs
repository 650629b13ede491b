// file: src/parser/frontmatter.rs
// description: YAML frontmatter extraction from markdown
// reference: https://docs.rs/yaml-rust

use crate::error::{IngestError, Result};
use std::collections::BTreeMap;
use yaml_rust::{Yaml, YamlLoader};

pub struct FrontmatterParser;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    pub fields: BTreeMap<String, String>,
}

impl Frontmatter {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

impl FrontmatterParser {
    pub fn new() -> Self {
        Self
    }

    /// Splits a leading `---` block off the document. The block ends at the
    /// next line that is exactly `---` or `...`.
    pub fn extract<'a>(&self, content: &'a str) -> Result<Option<(Frontmatter, &'a str)>> {
        let Some(rest) = content
            .strip_prefix("---\n")
            .or_else(|| content.strip_prefix("---\r\n"))
        else {
            return Ok(None);
        };

        let mut offset = 0;
        let mut closing = None;
        for line in rest.split_inclusive('\n') {
            let trimmed = line.trim_end_matches(['\r', '\n']);
            if trimmed == "---" || trimmed == "..." {
                closing = Some((offset, offset + line.len()));
                break;
            }
            offset += line.len();
        }

        let Some((yaml_end, body_start)) = closing else {
            return Ok(None);
        };

        let yaml_content = &rest[..yaml_end];
        let remaining_content = &rest[body_start..];

        let docs = YamlLoader::load_from_str(yaml_content).map_err(|e| {
            IngestError::extraction("frontmatter", format!("YAML parse error: {}", e))
        })?;

        let mut fields = BTreeMap::new();

        if let Some(Yaml::Hash(hash)) = docs.first() {
            for (key, value) in hash {
                if let (Some(k), Some(v)) = (yaml_scalar(key), yaml_value(value)) {
                    fields.insert(k, v);
                }
            }
        }

        Ok(Some((Frontmatter { fields }, remaining_content)))
    }
}

impl Default for FrontmatterParser {
    fn default() -> Self {
        Self::new()
    }
}

fn yaml_scalar(value: &Yaml) -> Option<String> {
    match value {
        Yaml::String(s) | Yaml::Real(s) => Some(s.clone()),
        Yaml::Integer(i) => Some(i.to_string()),
        Yaml::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

// Lists of scalars (e.g. several authors) collapse into one comma-separated value.
fn yaml_value(value: &Yaml) -> Option<String> {
    match value {
        Yaml::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(yaml_scalar).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        other => yaml_scalar(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frontmatter_extraction() {
        let parser = FrontmatterParser::new();
        let content = "---\ntitle: Test\nyear: 2024\n---\n\n# Content";

        let (frontmatter, remaining) = parser.extract(content).unwrap().unwrap();
        assert_eq!(frontmatter.get("title"), Some("Test"));
        assert_eq!(frontmatter.get("year"), Some("2024"));
        assert_eq!(remaining, "\n# Content");
    }

    #[test]
    fn test_author_list_joined() {
        let parser = FrontmatterParser::new();
        let content = "---\nauthor:\n  - Ada\n  - Grace\n---\nbody";

        let (frontmatter, _) = parser.extract(content).unwrap().unwrap();
        assert_eq!(frontmatter.get("author"), Some("Ada, Grace"));
    }

    #[test]
    fn test_body_rule_not_mistaken_for_closer() {
        let parser = FrontmatterParser::new();
        let content = "---\ntitle: Rules\n---\nabove\n\n---\n\nbelow";

        let (frontmatter, remaining) = parser.extract(content).unwrap().unwrap();
        assert_eq!(frontmatter.get("title"), Some("Rules"));
        assert!(remaining.contains("below"));
    }

    #[test]
    fn test_no_frontmatter() {
        let parser = FrontmatterParser::new();
        assert!(parser.extract("# Just a heading").unwrap().is_none());
        assert!(parser.extract("---\nunterminated: true\n").unwrap().is_none());
    }
}
