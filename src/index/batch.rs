// file: src/index/batch.rs
// description: pending document buffer with threshold flushes and final commit
// reference: batched submission to the search index

use crate::config::IndexConfig;
use crate::error::{IngestError, Result};
use crate::index::provider::SearchIndex;
use crate::models::Document;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Nothing was pending; no request was sent.
    Empty,
    Accepted { documents: usize, status: i32 },
    Rejected { documents: usize, status: i32 },
    Failed { documents: usize, reason: String },
}

impl FlushOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Empty | Self::Accepted { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SinkStats {
    pub flushes: usize,
    pub failed_flushes: usize,
    pub commits: usize,
}

pub struct BatchSink<I> {
    index: I,
    pending: Vec<Document>,
    flush_threshold: usize,
    commit_within: Duration,
    stats: SinkStats,
}

impl<I: SearchIndex> BatchSink<I> {
    pub fn new(index: I, flush_threshold: usize, commit_within: Duration) -> Self {
        let flush_threshold = flush_threshold.max(1);
        Self {
            index,
            pending: Vec::new(),
            flush_threshold,
            commit_within,
            stats: SinkStats::default(),
        }
    }

    pub fn from_config(index: I, config: &IndexConfig) -> Self {
        Self::new(index, config.flush_threshold, config.commit_within())
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn flush_threshold(&self) -> usize {
        self.flush_threshold
    }

    pub fn stats(&self) -> &SinkStats {
        &self.stats
    }

    /// Appends a document and flushes once the batch reaches the threshold.
    pub async fn push(&mut self, document: Document) -> Option<FlushOutcome> {
        self.pending.push(document);
        if self.pending.len() >= self.flush_threshold {
            Some(self.flush().await)
        } else {
            None
        }
    }

    /// Submits everything pending. The batch is empty afterwards whatever the
    /// index answered; failures are logged and counted, never returned.
    pub async fn flush(&mut self) -> FlushOutcome {
        if self.pending.is_empty() {
            return FlushOutcome::Empty;
        }

        let documents = self.pending.len();
        debug!(
            "Flushing {} documents (commit within {} ms)",
            documents,
            self.commit_within.as_millis()
        );

        let outcome = match self.index.add(&self.pending, self.commit_within).await {
            Ok(response) if response.is_success() => FlushOutcome::Accepted {
                documents,
                status: response.status,
            },
            Ok(response) => {
                warn!(
                    "Search index rejected batch of {} documents, status is: {}{}",
                    documents,
                    response.status,
                    response
                        .message
                        .as_deref()
                        .map(|m| format!(" ({})", m))
                        .unwrap_or_default()
                );
                FlushOutcome::Rejected {
                    documents,
                    status: response.status,
                }
            }
            Err(e) => {
                warn!("Failed to submit batch of {} documents: {}", documents, e);
                FlushOutcome::Failed {
                    documents,
                    reason: e.to_string(),
                }
            }
        };

        self.pending.clear();
        self.stats.flushes += 1;
        if !outcome.is_success() {
            self.stats.failed_flushes += 1;
        }

        outcome
    }

    /// Flushes the remainder, then issues exactly one explicit commit.
    pub async fn finalize(&mut self) -> Result<FlushOutcome> {
        let outcome = self.flush().await;

        let response = self.index.commit().await?;
        self.stats.commits += 1;

        if !response.is_success() {
            return Err(IngestError::Index(format!(
                "Commit failed with status {}{}",
                response.status,
                response
                    .message
                    .map(|m| format!(": {}", m))
                    .unwrap_or_default()
            )));
        }

        info!("Search index commit complete");
        Ok(outcome)
    }
}
