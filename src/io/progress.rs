//! Terminal progress for batch inpainting
//!
//! Each file is tracked in filled pixels out of its initial unknown count. At
//! most [`MAX_INDIVIDUAL_PROGRESS_BARS`] pixel bars are shown; bigger batches
//! cycle files through them and add a file counter on top.

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

use crate::io::configuration::MAX_INDIVIDUAL_PROGRESS_BARS;

static PIXEL_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{prefix:>24} {bar:30.green/white} {pos}/{len} px {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
});

static FILE_COUNT_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{elapsed_precise} files {bar:40.green/white} {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

/// Progress bars for a batch of files
pub struct ProgressManager {
    display: MultiProgress,
    overall: Option<ProgressBar>,
    slots: Vec<ProgressBar>,
    files: usize,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Manager with no bars until [`Self::initialize`] is called
    pub fn new() -> Self {
        Self {
            display: MultiProgress::new(),
            overall: None,
            slots: Vec::new(),
            files: 0,
        }
    }

    /// Create the bars for a batch of `files`
    pub fn initialize(&mut self, files: usize) {
        self.files = files;

        if files > MAX_INDIVIDUAL_PROGRESS_BARS {
            let overall = ProgressBar::new(files as u64).with_style(FILE_COUNT_STYLE.clone());
            self.overall = Some(self.display.add(overall));
        }

        self.slots = (0..files.min(MAX_INDIVIDUAL_PROGRESS_BARS))
            .map(|_| {
                self.display
                    .add(ProgressBar::new(0).with_style(PIXEL_STYLE.clone()))
            })
            .collect();
    }

    /// Batch size given to [`Self::initialize`]
    pub const fn file_count(&self) -> usize {
        self.files
    }

    /// Pixel bar showing the file at `index`
    ///
    /// Files share bars round-robin, so indices one cycle apart get the same bar.
    pub fn file_bar(&self, index: usize) -> Option<ProgressBar> {
        let slot = index.checked_rem(self.slots.len())?;
        self.slots.get(slot).cloned()
    }

    /// Point a bar at a new file with `unknown_pixels` left to fill
    pub fn start_file(&self, index: usize, path: &Path, unknown_pixels: usize) {
        let Some(bar) = self.file_bar(index) else {
            return;
        };
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        bar.reset();
        bar.set_length(unknown_pixels as u64);
        bar.set_prefix(name);
        bar.set_message("");
    }

    /// Show the file at `index` as done
    pub fn complete_file(&self, index: usize) {
        if let Some(overall) = &self.overall {
            overall.inc(1);
        }

        if let Some(bar) = self.file_bar(index) {
            bar.set_position(bar.length().unwrap_or(0));
            bar.set_message("done");
        }
    }

    /// Close the batch display
    pub fn finish(&self) {
        if let Some(overall) = &self.overall {
            overall.finish_with_message("batch complete");
        }
        if let Err(error) = self.display.clear() {
            debug!(%error, "progress display not cleared");
        }
    }
}
