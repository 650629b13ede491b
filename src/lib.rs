// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod extractor;
pub mod index;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod source;
pub mod utils;

pub use config::{Config, DatabaseConfig, FilesConfig, IndexConfig, PipelineConfig};
pub use error::{IngestError, Result};
pub use extractor::{AutoDetectExtractor, ContentParser, ExtractedContent, Metadata};
pub use index::{BatchSink, FlushOutcome, SearchIndex, SolrClient, UpdateResponse};
pub use models::Document;
pub use parser::{Frontmatter, FrontmatterParser, MarkdownParser, ParsedMarkdown};
pub use pipeline::{IngestPipeline, IngestStats, ProgressTracker, RunOptions};
pub use source::{FileOutcome, FileWalker, RowReader};
pub use utils::Validator;
