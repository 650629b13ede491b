// file: src/index/mod.rs
// description: search index client and batching module exports
// reference: internal module structure

pub mod batch;
pub mod provider;
pub mod solr;

pub use batch::{BatchSink, FlushOutcome, SinkStats};
pub use provider::{SearchIndex, UpdateResponse};
pub use solr::SolrClient;
