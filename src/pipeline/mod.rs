// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

mod orchestrator;
mod progress;

pub use orchestrator::{IngestPipeline, RunOptions};
pub use progress::{IngestStats, ProgressTracker, log_final_stats};
