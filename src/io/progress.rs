//! Multi-file progress tracking with automatic batching for large sets

use crate::engrave::PipelineObserver;
use crate::io::configuration::{MAX_INDIVIDUAL_PROGRESS_BARS, PROGRESS_BAR_WIDTH};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;

/// Coordinates progress display for batch operations
///
/// Each file gets a bar advancing once per rendered band. Large batches
/// additionally get a single batch bar counting finished files.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    file_count: usize,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

static BAND_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{prefix}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} bands"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Files: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

/// Progress bar for one file, advanced by the pipeline
pub struct FileProgress {
    bar: ProgressBar,
}

impl FileProgress {
    /// Bands completed so far
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Whether the bar has been finished and cleared
    pub fn is_finished(&self) -> bool {
        self.bar.is_finished()
    }
}

impl PipelineObserver for FileProgress {
    fn step_completed(&self, _index: usize, _total: usize) {
        self.bar.inc(1);
    }
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            file_count: 0,
        }
    }

    /// Initialize the batch bar when the file count warrants it
    pub fn initialize(&mut self, file_count: usize) {
        self.file_count = file_count;

        // Switch to batch mode for large file sets to avoid terminal spam
        if file_count > MAX_INDIVIDUAL_PROGRESS_BARS {
            let batch_bar = ProgressBar::new(file_count as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }
    }

    /// Number of files announced by `initialize`
    pub const fn file_count(&self) -> usize {
        self.file_count
    }

    /// Whether a batch bar is shown
    pub const fn is_batched(&self) -> bool {
        self.batch_bar.is_some()
    }

    /// Add a bar for a file that will render `bands` bands
    pub fn start_file(&self, path: &Path, bands: usize) -> FileProgress {
        let display_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let bar = self.multi_progress.add(ProgressBar::new(bands as u64));
        bar.set_style(BAND_STYLE.clone());
        bar.set_prefix(display_name);
        FileProgress { bar }
    }

    /// Files counted by the batch bar, if one is shown
    pub fn batch_position(&self) -> Option<u64> {
        self.batch_bar.as_ref().map(ProgressBar::position)
    }

    /// Mark a file as completed and update batch progress
    pub fn complete_file(&self, progress: &FileProgress) {
        self.release(progress);
    }

    /// Clear the bar of a file whose processing failed part way
    ///
    /// The batch bar still counts the file as handled.
    pub fn abandon_file(&self, progress: &FileProgress) {
        tracing::debug!(
            bands_done = progress.position(),
            "clearing progress of failed file"
        );
        self.release(progress);
    }

    fn release(&self, progress: &FileProgress) {
        progress.bar.finish_and_clear();
        self.multi_progress.remove(&progress.bar);
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All files processed");
        }
        let _ = self.multi_progress.clear();
    }
}
