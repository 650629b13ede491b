// file: src/index/provider.rs
// description: search index trait and update response model
// reference: backend-agnostic index interface injected into the batch sink

use crate::error::Result;
use crate::models::Document;
use async_trait::async_trait;
use std::time::Duration;

/// Outcome reported by the index for one update or commit request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateResponse {
    /// Zero means success; anything else is the index's error code.
    pub status: i32,
    pub qtime_ms: Option<u64>,
    pub message: Option<String>,
}

impl UpdateResponse {
    pub fn ok() -> Self {
        Self {
            status: 0,
            qtime_ms: None,
            message: None,
        }
    }

    pub fn with_status(status: i32) -> Self {
        Self {
            status,
            qtime_ms: None,
            message: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 0
    }
}

/// Backend seam for document submission. `Err` is reserved for transport
/// failures; a reachable index that refuses a request answers with a
/// non-zero status instead.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Submit documents, asking the index to make them visible within `commit_within`.
    async fn add(
        &self,
        documents: &[Document],
        commit_within: Duration,
    ) -> Result<UpdateResponse>;

    /// Make every pending write visible immediately.
    async fn commit(&self) -> Result<UpdateResponse>;
}
