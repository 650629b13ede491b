// file: src/pipeline/orchestrator.rs
// description: coordinates the file walk, the row read and the final commit
// reference: orchestrates the sequential ingestion workflow

use crate::config::Config;
use crate::error::Result;
use crate::extractor::AutoDetectExtractor;
use crate::index::{BatchSink, SearchIndex};
use crate::pipeline::progress::{IngestStats, ProgressTracker, log_final_stats};
use crate::source::{Candidate, FileOutcome, FileWalker, RowReader};
use futures::TryStreamExt;
use sqlx::AnyConnection;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Which phases a run executes and where the walk starts.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Overrides `files.root_dir`.
    pub root: Option<PathBuf>,
    pub skip_files: bool,
    pub skip_rows: bool,
}

/// Owns everything one ingestion run mutates: the pending batch, the counters
/// and the start time. Phases run strictly one after another.
pub struct IngestPipeline<I> {
    config: Config,
    sink: BatchSink<I>,
    walker: Arc<FileWalker>,
    progress: ProgressTracker,
}

impl<I: SearchIndex> IngestPipeline<I> {
    pub fn new(config: Config, index: I) -> Self {
        Self::with_extractor(config, index, Arc::new(AutoDetectExtractor::new()))
    }

    pub fn with_extractor(config: Config, index: I, extractor: Arc<AutoDetectExtractor>) -> Self {
        let sink = BatchSink::from_config(index, &config.index);
        let walker = Arc::new(FileWalker::new(config.files.clone(), extractor));
        let progress = ProgressTracker::new(
            config.pipeline.show_progress,
            colored::control::SHOULD_COLORIZE.should_colorize(),
        );

        Self {
            config,
            sink,
            walker,
            progress,
        }
    }

    /// Overrides the terminal's color detection for the spinner.
    pub fn with_color(mut self, colored: bool) -> Self {
        self.progress.set_colored(colored);
        self
    }

    pub fn sink(&self) -> &BatchSink<I> {
        &self.sink
    }

    pub fn stats(&self) -> IngestStats {
        self.progress.get_stats()
    }

    /// Runs the enabled phases, then finalizes. A failing phase is logged and
    /// the run moves on; only the final commit can fail the run.
    pub async fn run(mut self, options: &RunOptions) -> Result<IngestStats> {
        info!("Starting document ingestion");

        if options.skip_files {
            info!("File indexing skipped");
        } else {
            let root = options
                .root
                .clone()
                .unwrap_or_else(|| self.config.files.root_dir.clone());
            if let Err(e) = self.index_files(&root).await {
                error!("File indexing aborted for {}: {}", root.display(), e);
            }
        }

        if options.skip_rows {
            info!("Row indexing skipped");
        } else if let Err(e) = self.index_rows().await {
            error!("Row indexing aborted: {}", e);
        }

        self.finish().await
    }

    /// Walks `root` and appends one document per successfully extracted file.
    /// Extraction runs on the blocking pool, one file at a time.
    /// Returns the number of files indexed by this call.
    pub async fn index_files(&mut self, root: &Path) -> Result<usize> {
        let mut indexed = 0;
        let walker = Arc::clone(&self.walker);

        for candidate in walker.candidates(root)? {
            let outcome = match candidate {
                Candidate::File(path) => extract_blocking(Arc::clone(&walker), path).await,
                unreadable => walker.visit_candidate(unreadable),
            };

            match outcome {
                FileOutcome::Indexed { document, .. } => {
                    self.progress.set_message(document.id());
                    self.sink.push(document).await;
                    self.progress.inc_files_indexed();
                    indexed += 1;
                }
                FileOutcome::Failed { path, reason } => {
                    warn!("Failed to extract {}: {}", path.display(), reason);
                    self.progress.inc_files_failed();
                }
                FileOutcome::WalkError { path, reason } => {
                    match path {
                        Some(path) => warn!("Cannot read {}: {}", path.display(), reason),
                        None => warn!("Walk error: {}", reason),
                    }
                    self.progress.inc_walk_errors();
                }
            }
        }

        info!("Indexed {} files from {}", indexed, root.display());
        Ok(indexed)
    }

    /// Streams the configured query and appends one document per row. A
    /// decode failure stops the phase; rows already appended stay in the batch.
    /// The connection is closed on every path.
    pub async fn index_rows(&mut self) -> Result<usize> {
        if !self.config.database.enabled {
            info!("Database source disabled");
            return Ok(0);
        }

        let reader = RowReader::new(self.config.database.clone());
        let mut conn = reader.connect().await?;
        let result = self.append_rows(&reader, &mut conn).await;
        if let Err(e) = reader.close(conn).await {
            warn!("Failed to close database connection: {}", e);
        }

        let indexed = result?;
        info!("Indexed {} rows", indexed);
        Ok(indexed)
    }

    async fn append_rows(
        &mut self,
        reader: &RowReader,
        conn: &mut AnyConnection,
    ) -> Result<usize> {
        let mut rows = reader.rows(conn);
        let mut indexed = 0;

        while let Some(row) = rows.try_next().await? {
            let document = RowReader::to_document(&row)?;
            self.sink.push(document).await;
            self.progress.inc_rows_indexed();
            indexed += 1;
        }

        Ok(indexed)
    }

    /// Flushes what is left, commits once and emits the summary line.
    pub async fn finish(mut self) -> Result<IngestStats> {
        self.progress.set_message("Committing");
        let result = self.sink.finalize().await;

        let sink_stats = self.sink.stats();
        self.progress
            .set_flushes(sink_stats.flushes, sink_stats.failed_flushes);
        self.progress.finish();

        result?;

        let stats = self.progress.get_stats();
        info!("{}", stats.summary_line());
        log_final_stats(&stats);

        Ok(stats)
    }
}

async fn extract_blocking(walker: Arc<FileWalker>, path: PathBuf) -> FileOutcome {
    let failed_path = path.clone();
    match tokio::task::spawn_blocking(move || walker.visit(&path)).await {
        Ok(outcome) => outcome,
        Err(e) => FileOutcome::Failed {
            path: failed_path,
            reason: format!("extraction task failed: {}", e),
        },
    }
}
