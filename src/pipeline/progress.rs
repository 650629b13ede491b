// file: src/pipeline/progress.rs
// description: live ingestion counters and spinner rendering
// reference: uses indicatif for progress display and tracks ingestion metrics

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub files_indexed: usize,
    pub files_failed: usize,
    pub walk_errors: usize,
    pub rows_indexed: usize,
    pub flushes: usize,
    pub failed_flushes: usize,
    pub elapsed_ms: u128,
}

impl IngestStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents_indexed(&self) -> usize {
        self.files_indexed + self.rows_indexed
    }

    pub fn file_success_rate(&self) -> f64 {
        let total = self.files_indexed + self.files_failed;
        if total == 0 {
            return 0.0;
        }
        (self.files_indexed as f64 / total as f64) * 100.0
    }

    /// The one-line run summary.
    pub fn summary_line(&self) -> String {
        format!(
            "Total Time Taken: {} milliseconds to index {} SQL rows and {} documents",
            self.elapsed_ms, self.rows_indexed, self.files_indexed
        )
    }
}

/// Counters plus an optional spinner; the total is unknown up front so a
/// spinner is used instead of a bar.
pub struct ProgressTracker {
    spinner: ProgressBar,
    colored: bool,
    stats: IngestStats,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn new(visible: bool, colored: bool) -> Self {
        let spinner = if visible {
            create_spinner(colored)
        } else {
            ProgressBar::hidden()
        };

        Self {
            spinner,
            colored,
            stats: IngestStats::new(),
            start_time: Instant::now(),
        }
    }

    /// Restyles the spinner in place.
    pub fn set_colored(&mut self, colored: bool) {
        self.colored = colored;
        if let Ok(style) = ProgressStyle::default_spinner().template(spinner_template(colored)) {
            self.spinner.set_style(style);
        }
    }

    pub fn is_colored(&self) -> bool {
        self.colored
    }

    pub fn inc_files_indexed(&mut self) {
        self.stats.files_indexed += 1;
        self.refresh();
    }

    pub fn inc_files_failed(&mut self) {
        self.stats.files_failed += 1;
        self.refresh();
    }

    pub fn inc_walk_errors(&mut self) {
        self.stats.walk_errors += 1;
        self.refresh();
    }

    pub fn inc_rows_indexed(&mut self) {
        self.stats.rows_indexed += 1;
        self.refresh();
    }

    pub fn set_flushes(&mut self, flushes: usize, failed: usize) {
        self.stats.flushes = flushes;
        self.stats.failed_flushes = failed;
    }

    pub fn set_message(&self, message: impl Into<String>) {
        self.spinner.set_message(message.into());
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }

    pub fn get_stats(&self) -> IngestStats {
        IngestStats {
            elapsed_ms: self.elapsed().as_millis(),
            ..self.stats.clone()
        }
    }

    fn refresh(&self) {
        self.spinner.set_message(format!(
            "Files: {} | Failed: {} | Rows: {}",
            self.stats.files_indexed, self.stats.files_failed, self.stats.rows_indexed
        ));
        self.spinner.tick();
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn spinner_template(colored: bool) -> &'static str {
    if colored {
        "{spinner:.green} [{elapsed_precise}] {msg}"
    } else {
        "{spinner} [{elapsed_precise}] {msg}"
    }
}

fn create_spinner(colored: bool) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template(spinner_template(colored)) {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

pub fn log_final_stats(stats: &IngestStats) {
    info!("{}", "=== Ingestion Summary ===".bold());
    info!("Files indexed: {}", stats.files_indexed);
    info!("Files failed: {}", stats.files_failed);
    if stats.walk_errors > 0 {
        info!("Unreadable entries: {}", stats.walk_errors);
    }
    info!("Rows indexed: {}", stats.rows_indexed);
    info!(
        "Flushes: {} ({} failed)",
        stats.flushes, stats.failed_flushes
    );
    if stats.files_indexed + stats.files_failed > 0 {
        info!("File success rate: {:.1}%", stats.file_success_rate());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_calculations() {
        let stats = IngestStats {
            files_indexed: 9,
            files_failed: 1,
            rows_indexed: 5,
            ..IngestStats::new()
        };

        assert_eq!(stats.documents_indexed(), 14);
        assert!((stats.file_success_rate() - 90.0).abs() < 0.01);
        assert_eq!(IngestStats::new().file_success_rate(), 0.0);
    }

    #[test]
    fn test_summary_line() {
        let stats = IngestStats {
            files_indexed: 3,
            rows_indexed: 2,
            elapsed_ms: 1500,
            ..IngestStats::new()
        };

        assert_eq!(
            stats.summary_line(),
            "Total Time Taken: 1500 milliseconds to index 2 SQL rows and 3 documents"
        );
    }

    #[test]
    fn test_hidden_tracker_counts() {
        let mut tracker = ProgressTracker::new(false, false);

        tracker.inc_files_indexed();
        tracker.inc_files_indexed();
        tracker.inc_files_failed();
        tracker.inc_rows_indexed();
        tracker.set_flushes(2, 1);

        let stats = tracker.get_stats();
        assert_eq!(stats.files_indexed, 2);
        assert_eq!(stats.files_failed, 1);
        assert_eq!(stats.rows_indexed, 1);
        assert_eq!(stats.failed_flushes, 1);
    }

    #[test]
    fn test_uncolored_spinner_has_no_color_directive() {
        assert!(spinner_template(true).contains(".green"));
        assert!(!spinner_template(false).contains(".green"));

        let mut tracker = ProgressTracker::new(false, true);
        assert!(tracker.is_colored());
        tracker.set_colored(false);
        assert!(!tracker.is_colored());
    }
}
